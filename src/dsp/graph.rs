//! The fixed render-side signal topology.
//!
//! Per voice:
//!
//! ```text
//! oscillator ─▶ envelope gain ─▶ lowpass ─▶ gain ─▶ stereo panner ─┐
//!                    ▲                                             │
//!               LFO (square)                                       │
//!                                                                  ▼
//!                             global lowpass (L/R) ─▶ master gain ─▶ out
//! ```
//!
//! The graph is built once and never rewired. The only way to change it is
//! through [`GraphCommand`]s, which retarget parameters on existing nodes.

use super::context::{GraphCommand, NodeParam};
use super::filter::BiquadFilter;
use super::mixer::Mixer;
use super::oscillator::{Oscillator, Waveform};
use super::panner::StereoPanner;

/// Cutoff of each voice's own lowpass.
pub const VOICE_LOWPASS_HZ: f64 = 1000.0;
/// Fixed per-voice output level.
pub const VOICE_GAIN: f64 = 0.1;

const INITIAL_PITCH_HZ: f64 = 440.0;
const INITIAL_LFO_HZ: f64 = 1.0;
const INITIAL_CUTOFF_HZ: f64 = 350.0;

struct VoiceChain {
    oscillator: Oscillator,
    lfo: Oscillator,
    started: bool,
    starts: u32,
    lowpass: BiquadFilter,
    gain: f64,
    panner: StereoPanner,
}

impl VoiceChain {
    fn new(sample_rate: f64) -> Self {
        VoiceChain {
            oscillator: Oscillator::new(Waveform::Sawtooth, INITIAL_PITCH_HZ, sample_rate),
            lfo: Oscillator::new(Waveform::Square, INITIAL_LFO_HZ, sample_rate),
            started: false,
            starts: 0,
            lowpass: BiquadFilter::lowpass(VOICE_LOWPASS_HZ, sample_rate),
            gain: VOICE_GAIN,
            panner: StereoPanner::new(0.0),
        }
    }

    fn next_frame(&mut self) -> (f64, f64) {
        if !self.started {
            return (0.0, 0.0);
        }
        // The LFO sums onto the envelope gain's intrinsic value of 1.
        let envelope = 1.0 + self.lfo.next_sample();
        let sample = self.oscillator.next_sample() * envelope;
        let sample = self.lowpass.process(sample) * self.gain;
        self.panner.process(sample)
    }
}

pub struct SynthGraph {
    voices: Vec<VoiceChain>,
    global_filter: [BiquadFilter; 2],
    mixer: Mixer,
}

impl SynthGraph {
    pub fn new(sample_rate: f64, voice_count: usize) -> Self {
        SynthGraph {
            voices: (0..voice_count).map(|_| VoiceChain::new(sample_rate)).collect(),
            global_filter: [
                BiquadFilter::lowpass(INITIAL_CUTOFF_HZ, sample_rate),
                BiquadFilter::lowpass(INITIAL_CUTOFF_HZ, sample_rate),
            ],
            mixer: Mixer::new(),
        }
    }

    pub fn apply(&mut self, command: GraphCommand) {
        match command {
            GraphCommand::SetParam { param, value } => self.set_param(param, value),
            GraphCommand::SetWaveform { voice, waveform } => {
                if let Some(v) = self.voice_mut(voice) {
                    v.oscillator.waveform = waveform;
                }
            }
            GraphCommand::StartVoice(voice) => {
                if let Some(v) = self.voice_mut(voice) {
                    if v.started {
                        log::warn!(target: "synth::graph", "voice {voice} already started");
                    } else {
                        v.started = true;
                        v.starts += 1;
                    }
                }
            }
        }
    }

    fn set_param(&mut self, param: NodeParam, value: f64) {
        // One NaN in a filter or phase accumulator never washes out.
        if !value.is_finite() {
            log::warn!(target: "synth::graph", "{param:?} = {value} ignored");
            return;
        }
        match param {
            NodeParam::OscillatorFrequency(voice) => {
                if let Some(v) = self.voice_mut(voice) {
                    v.oscillator.frequency = value;
                }
            }
            NodeParam::LfoFrequency(voice) => {
                if let Some(v) = self.voice_mut(voice) {
                    v.lfo.frequency = value;
                }
            }
            NodeParam::Pan(voice) => {
                if let Some(v) = self.voice_mut(voice) {
                    v.panner.set_pan(value);
                }
            }
            NodeParam::FilterCutoff => {
                for f in self.global_filter.iter_mut() {
                    f.set_frequency(value);
                }
            }
            NodeParam::MasterGain => self.mixer.master_gain = value,
        }
    }

    fn voice_mut(&mut self, voice: usize) -> Option<&mut VoiceChain> {
        let found = self.voices.get_mut(voice);
        if found.is_none() {
            log::warn!(target: "synth::graph", "command for unknown voice {voice} ignored");
        }
        found
    }

    /// Render interleaved stereo into `out`.
    pub fn process(&mut self, out: &mut [f32]) {
        let frames = out.len() / 2;
        self.mixer.clear(frames);

        for i in 0..frames {
            for voice in self.voices.iter_mut() {
                let (l, r) = voice.next_frame();
                self.mixer.add(i, l, r);
            }
        }

        let (left, right) = self.mixer.channels_mut();
        let [filter_l, filter_r] = &mut self.global_filter;
        for s in left.iter_mut() {
            *s = filter_l.process(*s);
        }
        for s in right.iter_mut() {
            *s = filter_r.process(*s);
        }

        self.mixer.write_interleaved(out);
    }

    pub fn oscillator_frequency(&self, voice: usize) -> Option<f64> {
        self.voices.get(voice).map(|v| v.oscillator.frequency)
    }

    pub fn lfo_frequency(&self, voice: usize) -> Option<f64> {
        self.voices.get(voice).map(|v| v.lfo.frequency)
    }

    pub fn waveform(&self, voice: usize) -> Option<Waveform> {
        self.voices.get(voice).map(|v| v.oscillator.waveform)
    }

    pub fn pan(&self, voice: usize) -> Option<f64> {
        self.voices.get(voice).map(|v| v.panner.pan())
    }

    /// How many times the voice's oscillators were started.
    pub fn oscillator_starts(&self, voice: usize) -> u32 {
        self.voices.get(voice).map_or(0, |v| v.starts)
    }

    pub fn filter_cutoff(&self) -> f64 {
        self.global_filter[0].frequency
    }

    pub fn master_gain(&self) -> f64 {
        self.mixer.master_gain
    }
}
