//! Control-side owner of one oscillator chain and its two glides.

use crate::config::VoiceConfig;
use crate::dsp::context::{AudioContext, NodeParam};
use crate::dsp::oscillator::Waveform;
use crate::glide::{Glide, GlideKind};
use crate::scale;
use crate::timer::{Scheduler, TimerId};

/// Static stereo position of voice `index` out of `count`, spread evenly
/// from hard left to hard right.
pub fn pan_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    -1.0 + 2.0 * index as f64 / (count - 1) as f64
}

/// One timbral layer: pitch and LFO rate glide independently, each with its
/// own timer handle.
#[derive(Debug)]
pub struct Voice {
    index: usize,
    pan: f64,
    waveform: Waveform,
    pitch: Glide,
    lfo: Glide,
    started: bool,
}

impl Voice {
    /// Build the voice and push its initial node values into the graph.
    pub fn new(
        index: usize,
        voice_count: usize,
        config: &VoiceConfig,
        initial_lfo_hz: f64,
        context: &AudioContext,
    ) -> Self {
        let pan = pan_position(index, voice_count);
        context.set_value_at_time(NodeParam::Pan(index), pan);
        context.set_waveform(index, config.waveform);
        context.set_value_at_time(
            NodeParam::OscillatorFrequency(index),
            config.base_frequency_hz,
        );
        context.set_value_at_time(NodeParam::LfoFrequency(index), initial_lfo_hz);

        Voice {
            index,
            pan,
            waveform: config.waveform,
            pitch: Glide::new(GlideKind::Pitch, config.base_frequency_hz),
            lfo: Glide::new(GlideKind::LfoRate, initial_lfo_hz),
            started: false,
        }
    }

    /// Start the oscillator and its LFO. One-shot.
    pub fn start(&mut self, context: &AudioContext) {
        if self.started {
            log::debug!(target: "synth::voice", "voice {} already started", self.index);
            return;
        }
        self.started = true;
        context.start_voice(self.index);
    }

    /// Switch timbre immediately. Waveform changes never glide.
    pub fn set_waveform(&mut self, waveform: Waveform, context: &AudioContext) {
        if self.waveform != waveform {
            log::debug!(target: "synth::voice", "voice {} -> {waveform}", self.index);
        }
        self.waveform = waveform;
        context.set_waveform(self.index, waveform);
    }

    /// Glide toward the scale degree selected by `normalized`.
    pub fn set_pitch(&mut self, normalized: f64, config: &VoiceConfig, scheduler: &mut Scheduler) {
        let target = scale::quantize(normalized, config.base_frequency_hz);
        self.glide_to(GlideKind::Pitch, target, config.glide_time_ms, scheduler);
    }

    /// Glide the LFO toward `normalized` mapped onto the configured band.
    pub fn set_lfo_rate(&mut self, normalized: f64, config: &VoiceConfig, scheduler: &mut Scheduler) {
        let target = config.lfo_rate(normalized);
        self.glide_to(GlideKind::LfoRate, target, config.glide_time_ms, scheduler);
    }

    fn glide_to(&mut self, kind: GlideKind, target: f64, period_ms: f64, scheduler: &mut Scheduler) {
        if !target.is_finite() {
            log::warn!(
                target: "synth::voice",
                "voice {} {kind:?} target {target} ignored",
                self.index
            );
            return;
        }
        let glide = match kind {
            GlideKind::Pitch => &mut self.pitch,
            GlideKind::LfoRate => &mut self.lfo,
        };
        glide.retarget(target, period_ms, scheduler);
    }

    /// Handle a fired timer. Returns false if the timer is not ours.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut Scheduler, context: &AudioContext) -> bool {
        let (glide, param) = if self.pitch.owns(id) {
            (&mut self.pitch, NodeParam::OscillatorFrequency(self.index))
        } else if self.lfo.owns(id) {
            (&mut self.lfo, NodeParam::LfoFrequency(self.index))
        } else {
            return false;
        };

        let value = glide.step(scheduler);
        log::trace!(
            target: "synth::voice",
            "voice {} {:?} -> {value}",
            self.index,
            glide.kind()
        );
        context.set_value_at_time(param, value);
        true
    }

    pub fn cancel_glides(&mut self, scheduler: &mut Scheduler) {
        self.pitch.cancel(scheduler);
        self.lfo.cancel(scheduler);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pan(&self) -> f64 {
        self.pan
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn pitch_hz(&self) -> f64 {
        self.pitch.current()
    }

    pub fn pitch_target_hz(&self) -> f64 {
        self.pitch.target()
    }

    pub fn lfo_hz(&self) -> f64 {
        self.lfo.current()
    }

    pub fn lfo_target_hz(&self) -> f64 {
        self.lfo.target()
    }

    pub fn is_gliding(&self, kind: GlideKind) -> bool {
        match kind {
            GlideKind::Pitch => self.pitch.is_active(),
            GlideKind::LfoRate => self.lfo.is_active(),
        }
    }
}
