//! Audio engine: fans a parameter vector out to the voices and the shared
//! output chain, and owns transport (start / stop / resume).
//!
//! Vector layout (a fixed contract with whatever produces the vector):
//!
//! | slots | drives                         |
//! | ----- | ------------------------------ |
//! | 0–2   | pitch of voice 0–2             |
//! | 3–5   | LFO rate of voice 0–2          |
//! | 6     | global filter cutoff           |
//!
//! Shorter vectors are applied as far as they reach. The filter always
//! follows the *last* element, whatever the length.

use std::ops::Range;

use rand::Rng;

use crate::config::{ConfigSnapshot, VoiceConfig};
use crate::dsp::context::{AudioContext, NodeParam};
use crate::error::{EngineError, StateError};
use crate::timer::Scheduler;
use crate::voice::Voice;
use crate::{PARAMETER_COUNT, VOICE_COUNT};

/// Band the global cutoff is drawn from at construction.
pub const INITIAL_CUTOFF_RANGE_HZ: Range<f64> = 100.0..600.0;
/// Band each voice's initial LFO rate is drawn from.
pub const INITIAL_LFO_RANGE_HZ: Range<f64> = 1.0..6.0;
/// Initial position of every fader.
pub const FADER_DEFAULT: f64 = 0.5;

const CUTOFF_SPAN_HZ: f64 = 300.0;
const CUTOFF_FLOOR_HZ: f64 = 100.0;

/// Global filter cutoff for a normalized control value.
pub fn filter_cutoff(normalized: f64) -> f64 {
    normalized * CUTOFF_SPAN_HZ + CUTOFF_FLOOR_HZ
}

/// Transport state. `started` is one-way; `running` toggles after start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    pub started: bool,
    pub running: bool,
}

pub struct AudioEngine {
    context: AudioContext,
    scheduler: Scheduler,
    config: ConfigSnapshot,
    voices: Vec<Voice>,
    filter_cutoff_hz: f64,
    master_gain: f64,
    state: EngineState,
    parameters: [f64; PARAMETER_COUNT],
}

impl AudioEngine {
    pub fn new(context: AudioContext, config: VoiceConfig) -> Result<Self, EngineError> {
        Self::with_rng(context, config, &mut rand::thread_rng())
    }

    /// Build the engine with an explicit source for the randomized initial
    /// cutoff and LFO rates.
    pub fn with_rng<R: Rng>(
        context: AudioContext,
        config: VoiceConfig,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let filter_cutoff_hz = rng.gen_range(INITIAL_CUTOFF_RANGE_HZ);
        context.set_value_at_time(NodeParam::FilterCutoff, filter_cutoff_hz);
        context.set_value_at_time(NodeParam::MasterGain, 1.0);

        let voices = (0..VOICE_COUNT)
            .map(|i| {
                let lfo_hz = rng.gen_range(INITIAL_LFO_RANGE_HZ);
                Voice::new(i, VOICE_COUNT, &config, lfo_hz, &context)
            })
            .collect();

        log::debug!(
            target: "synth::engine",
            "engine built: {VOICE_COUNT} voices, cutoff {filter_cutoff_hz:.1} Hz"
        );

        Ok(AudioEngine {
            context,
            scheduler: Scheduler::new(),
            config: ConfigSnapshot::initial(config),
            voices,
            filter_cutoff_hz,
            master_gain: 1.0,
            state: EngineState::default(),
            parameters: [FADER_DEFAULT; PARAMETER_COUNT],
        })
    }

    /// Start every voice's oscillators. Only valid once.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.state.started {
            log::warn!(target: "synth::engine", "start() called twice");
            return Err(StateError::AlreadyStarted.into());
        }
        for voice in self.voices.iter_mut() {
            voice.start(&self.context);
        }
        self.state = EngineState {
            started: true,
            running: true,
        };
        log::debug!(target: "synth::engine", "started");
        Ok(())
    }

    /// Mute the output. Oscillators keep running underneath.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.require_started("stop")?;
        self.set_master_gain(0.0);
        self.state.running = false;
        log::debug!(target: "synth::engine", "stopped");
        Ok(())
    }

    /// Unmute the output.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.require_started("resume")?;
        self.set_master_gain(1.0);
        self.state.running = true;
        log::debug!(target: "synth::engine", "resumed");
        Ok(())
    }

    fn require_started(&self, op: &str) -> Result<(), StateError> {
        if self.state.started {
            Ok(())
        } else {
            log::warn!(target: "synth::engine", "{op}() before start()");
            Err(StateError::NotStarted)
        }
    }

    fn set_master_gain(&mut self, gain: f64) {
        self.master_gain = gain;
        self.context.set_value_at_time(NodeParam::MasterGain, gain);
    }

    /// Apply a parameter vector: all pitches, then all LFO rates, then the
    /// filter. An empty vector changes nothing, and slots holding NaN or an
    /// infinity leave their target as it was.
    pub fn set_parameters(&mut self, vector: &[f64]) {
        let Some(&last) = vector.last() else {
            return;
        };
        if vector.len() < PARAMETER_COUNT {
            log::trace!(
                target: "synth::engine",
                "partial vector of {} values applied",
                vector.len()
            );
        }
        let skipped = vector.iter().filter(|v| !v.is_finite()).count();
        if skipped > 0 {
            log::warn!(target: "synth::engine", "{skipped} non-finite values skipped");
        }

        let config = self.config.shared();

        for (i, voice) in self.voices.iter_mut().enumerate() {
            if let Some(&value) = vector.get(i).filter(|v| v.is_finite()) {
                voice.set_pitch(value, &config, &mut self.scheduler);
                self.parameters[i] = value;
            }
        }

        for (i, voice) in self.voices.iter_mut().enumerate() {
            if let Some(&value) = vector.get(i + VOICE_COUNT).filter(|v| v.is_finite()) {
                voice.set_lfo_rate(value, &config, &mut self.scheduler);
                self.parameters[i + VOICE_COUNT] = value;
            }
        }

        let cutoff = filter_cutoff(last);
        if cutoff.is_finite() {
            self.filter_cutoff_hz = cutoff;
            self.context.set_value_at_time(NodeParam::FilterCutoff, cutoff);
            self.parameters[PARAMETER_COUNT - 1] = last;
        }
    }

    /// Move a single fader and re-apply the whole vector.
    pub fn set_parameter(&mut self, index: usize, value: f64) {
        if index >= PARAMETER_COUNT {
            log::warn!(target: "synth::engine", "parameter index {index} out of range");
            return;
        }
        if !value.is_finite() {
            log::warn!(target: "synth::engine", "parameter {index} set to {value}, ignored");
            return;
        }
        self.parameters[index] = value;
        let vector = self.parameters;
        self.set_parameters(&vector);
    }

    /// Install a new voice config. On error the previous config stays.
    ///
    /// The waveform switches at once; pitch and LFO pick the new values up
    /// from the next glide, glides in flight keep what they started with.
    pub fn install_config(&mut self, config: VoiceConfig) -> Result<(), EngineError> {
        if let Err(e) = config.validate() {
            log::warn!(target: "synth::config", "config rejected: {e}");
            return Err(e.into());
        }
        for voice in self.voices.iter_mut() {
            voice.set_waveform(config.waveform, &self.context);
        }
        self.config = self.config.succeed(config);
        log::debug!(
            target: "synth::config",
            "config v{} installed",
            self.config.version()
        );
        Ok(())
    }

    pub fn install_config_json(&mut self, json: &str) -> Result<(), EngineError> {
        let config = VoiceConfig::from_json(json).inspect_err(|e| {
            log::warn!(target: "synth::config", "config rejected: {e}");
        })?;
        self.install_config(config)
    }

    /// Advance the control clock and run every glide tick that came due.
    pub fn tick(&mut self, elapsed_ms: f64) {
        if !elapsed_ms.is_finite() {
            log::warn!(target: "synth::engine", "tick of {elapsed_ms} ms ignored");
            return;
        }
        let deadline = self.scheduler.now_ms() + elapsed_ms.max(0.0);
        self.tick_to(deadline);
    }

    /// Like [`tick`](Self::tick), against an absolute clock reading.
    pub fn tick_to(&mut self, deadline: f64) {
        if !deadline.is_finite() {
            log::warn!(target: "synth::engine", "tick to {deadline} ms ignored");
            return;
        }
        while let Some(id) = self.scheduler.poll(deadline) {
            let handled = self
                .voices
                .iter_mut()
                .any(|v| v.on_timer(id, &mut self.scheduler, &self.context));
            if !handled {
                log::warn!(target: "synth::engine", "stray timer {id:?} cleared");
                self.scheduler.clear_interval(id);
            }
        }
        self.scheduler.advance_to(deadline);
    }

    /// Tear down: cancel every glide and release the audio graph.
    pub fn dispose(mut self) {
        for voice in self.voices.iter_mut() {
            voice.cancel_glides(&mut self.scheduler);
        }
        self.scheduler.clear_all();
        self.context.close();
        log::debug!(target: "synth::engine", "disposed");
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn filter_cutoff_hz(&self) -> f64 {
        self.filter_cutoff_hz
    }

    pub fn master_gain(&self) -> f64 {
        self.master_gain
    }

    /// The vector as last applied, one slot per fader.
    pub fn parameters(&self) -> &[f64; PARAMETER_COUNT] {
        &self.parameters
    }

    pub fn config(&self) -> &VoiceConfig {
        self.config.config()
    }

    pub fn config_version(&self) -> u64 {
        self.config.version()
    }

    /// Number of glides currently in flight across all voices.
    pub fn active_glides(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    pub fn sample_rate(&self) -> f64 {
        self.context.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::context::Renderer;
    use crate::dsp::oscillator::Waveform;
    use crate::error::ConfigError;
    use crate::glide::GlideKind;
    use crate::scale::quantize;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine_with(config: VoiceConfig) -> (AudioEngine, Renderer) {
        let (ctx, renderer) = AudioContext::new(48000.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let engine = AudioEngine::with_rng(ctx, config, &mut rng).unwrap();
        (engine, renderer)
    }

    fn glide_config(glide_time_ms: f64) -> VoiceConfig {
        VoiceConfig {
            glide_time_ms,
            ..VoiceConfig::default()
        }
    }

    #[test]
    fn initial_random_values_lie_in_their_bands() {
        for seed in 0..50 {
            let (ctx, _renderer) = AudioContext::new(48000.0).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let engine = AudioEngine::with_rng(ctx, VoiceConfig::default(), &mut rng).unwrap();
            assert!(INITIAL_CUTOFF_RANGE_HZ.contains(&engine.filter_cutoff_hz()));
            for voice in engine.voices() {
                assert!(INITIAL_LFO_RANGE_HZ.contains(&voice.lfo_hz()));
            }
        }
    }

    #[test]
    fn thread_rng_constructor_builds_fixed_voice_count() {
        let (ctx, mut renderer) = AudioContext::new(48000.0).unwrap();
        let engine = AudioEngine::new(ctx, VoiceConfig::default()).unwrap();
        assert_eq!(engine.voices().len(), VOICE_COUNT);
        assert!(INITIAL_CUTOFF_RANGE_HZ.contains(&engine.filter_cutoff_hz()));

        renderer.sync();
        assert_eq!(renderer.graph().filter_cutoff(), engine.filter_cutoff_hz());
        assert_eq!(renderer.graph().master_gain(), 1.0);
        let pans: Vec<f64> = engine.voices().iter().map(|v| v.pan()).collect();
        assert_eq!(pans, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn invalid_initial_config_is_rejected() {
        let (ctx, _renderer) = AudioContext::new(48000.0).unwrap();
        let config = VoiceConfig {
            lfo_min_hz: 50.0,
            lfo_max_hz: 5.0,
            ..VoiceConfig::default()
        };
        assert!(matches!(
            AudioEngine::new(ctx, config),
            Err(EngineError::Config(ConfigError::InvalidLfoRange { .. }))
        ));
    }

    #[test]
    fn empty_vector_changes_nothing() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        let cutoff = engine.filter_cutoff_hz();
        let before: Vec<(f64, f64)> = engine
            .voices()
            .iter()
            .map(|v| (v.pitch_target_hz(), v.lfo_target_hz()))
            .collect();

        engine.set_parameters(&[]);

        let after: Vec<(f64, f64)> = engine
            .voices()
            .iter()
            .map(|v| (v.pitch_target_hz(), v.lfo_target_hz()))
            .collect();
        assert_eq!(before, after);
        assert_eq!(engine.filter_cutoff_hz(), cutoff);
        assert_eq!(engine.active_glides(), 0);
        assert_eq!(engine.parameters(), &[FADER_DEFAULT; PARAMETER_COUNT]);
    }

    #[test]
    fn full_vector_drives_every_target() {
        let config = glide_config(10.0);
        let (mut engine, mut renderer) = engine_with(config.clone());
        engine.set_parameters(&[0.5; 7]);
        assert_eq!(engine.active_glides(), 6);
        assert_eq!(engine.filter_cutoff_hz(), 250.0);

        engine.tick(1000.0);
        assert_eq!(engine.active_glides(), 0);

        let pitch = quantize(0.5, 440.0);
        let lfo = 0.5 * (config.lfo_max_hz - config.lfo_min_hz) + config.lfo_min_hz;
        for voice in engine.voices() {
            assert_eq!(voice.pitch_hz(), pitch);
            assert_eq!(voice.lfo_hz(), lfo);
        }

        renderer.sync();
        for i in 0..VOICE_COUNT {
            assert_eq!(renderer.graph().oscillator_frequency(i), Some(pitch));
            assert_eq!(renderer.graph().lfo_frequency(i), Some(lfo));
        }
        assert_eq!(renderer.graph().filter_cutoff(), 250.0);
    }

    #[test]
    fn short_vector_only_touches_covered_slots() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        let untouched = engine.voice(2).unwrap().pitch_target_hz();

        engine.set_parameters(&[1.0, 0.0]);

        assert_eq!(engine.voice(0).unwrap().pitch_target_hz(), 880.0);
        assert_eq!(engine.voice(1).unwrap().pitch_target_hz(), 440.0);
        assert_eq!(engine.voice(2).unwrap().pitch_target_hz(), untouched);
        assert!(!engine.voice(0).unwrap().is_gliding(GlideKind::LfoRate));
        assert_eq!(engine.active_glides(), 2);
        // The filter follows the last element supplied.
        assert_eq!(engine.filter_cutoff_hz(), 100.0);
        assert_eq!(engine.parameters(), &[1.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn five_value_vector_reaches_two_lfos() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameters(&[0.0, 0.0, 0.0, 1.0, 1.0]);
        assert!(engine.voice(0).unwrap().is_gliding(GlideKind::LfoRate));
        assert!(engine.voice(1).unwrap().is_gliding(GlideKind::LfoRate));
        assert!(!engine.voice(2).unwrap().is_gliding(GlideKind::LfoRate));
        assert_eq!(engine.voice(1).unwrap().lfo_target_hz(), 1000.0);
        assert_eq!(engine.filter_cutoff_hz(), 400.0);
    }

    #[test]
    fn overlapping_vectors_keep_one_glide_per_target() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameters(&[1.0; 7]);
        engine.tick(100.0);
        engine.set_parameters(&[0.0; 7]);
        engine.tick(100.0);
        engine.set_parameters(&[0.0; 7]);
        assert_eq!(engine.active_glides(), 6);

        // The superseded octave target is never reached.
        for _ in 0..200 {
            engine.tick(10.0);
            for voice in engine.voices() {
                assert_ne!(voice.pitch_hz(), 880.0);
            }
        }
        assert_eq!(engine.active_glides(), 0);
        assert!(engine.voices().iter().all(|v| v.pitch_hz() == 440.0));
    }

    #[test]
    fn zero_glide_time_still_slides_at_minimum_interval() {
        let (mut engine, _renderer) = engine_with(glide_config(0.0));
        engine.set_parameters(&[1.0]);
        engine.tick(399.0);
        assert!(engine.voice(0).unwrap().is_gliding(GlideKind::Pitch));
        engine.tick(1.0);
        assert!(!engine.voice(0).unwrap().is_gliding(GlideKind::Pitch));
        assert_eq!(engine.voice(0).unwrap().pitch_hz(), 880.0);
    }

    #[test]
    fn glide_in_flight_ignores_config_changes() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameters(&[1.0]);
        engine.tick(500.0);

        engine
            .install_config(VoiceConfig {
                base_frequency_hz: 220.0,
                glide_time_ms: 20.0,
                ..VoiceConfig::default()
            })
            .unwrap();

        engine.tick(500.0);
        let voice = engine.voice(0).unwrap();
        assert!(!voice.is_gliding(GlideKind::Pitch));
        assert_eq!(voice.pitch_hz(), 880.0);

        // The next glide picks up the new base and period.
        engine.set_parameters(&[1.0]);
        assert_eq!(engine.voice(0).unwrap().pitch_target_hz(), 440.0);
        engine.tick(1980.0);
        assert!(engine.voice(0).unwrap().is_gliding(GlideKind::Pitch));
        engine.tick(20.0);
        assert_eq!(engine.voice(0).unwrap().pitch_hz(), 440.0);
    }

    #[test]
    fn rejected_config_keeps_last_known_good() {
        let (mut engine, _renderer) = engine_with(VoiceConfig::default());
        let err = engine.install_config(VoiceConfig {
            base_frequency_hz: -5.0,
            ..VoiceConfig::default()
        });
        assert_eq!(
            err,
            Err(EngineError::Config(ConfigError::NonPositiveBaseFrequency(-5.0)))
        );
        assert_eq!(engine.config(), &VoiceConfig::default());
        assert_eq!(engine.config_version(), 0);

        let err = engine.install_config_json(r#"{"waveform": "sine"}"#);
        assert_eq!(
            err,
            Err(EngineError::Config(ConfigError::MissingField("baseFrequencyHz")))
        );
        assert_eq!(engine.config_version(), 0);
    }

    #[test]
    fn installed_config_switches_waveform_at_once() {
        let (mut engine, mut renderer) = engine_with(VoiceConfig::default());
        engine
            .install_config_json(
                r#"{"baseFrequencyHz": 330, "waveform": "triangle",
                    "lfoMinHz": 1, "lfoMaxHz": 8, "glideTimeMs": 12}"#,
            )
            .unwrap();
        assert_eq!(engine.config_version(), 1);
        assert_eq!(engine.config().base_frequency_hz, 330.0);

        renderer.sync();
        for i in 0..VOICE_COUNT {
            assert_eq!(engine.voice(i).unwrap().waveform(), Waveform::Triangle);
            assert_eq!(renderer.graph().waveform(i), Some(Waveform::Triangle));
        }
    }

    #[test]
    fn transport_state_machine() {
        let (mut engine, mut renderer) = engine_with(VoiceConfig::default());
        assert_eq!(engine.state(), EngineState::default());

        assert_eq!(engine.stop(), Err(EngineError::State(StateError::NotStarted)));
        assert_eq!(engine.resume(), Err(EngineError::State(StateError::NotStarted)));
        assert_eq!(engine.state(), EngineState::default());
        assert_eq!(engine.master_gain(), 1.0);

        engine.start().unwrap();
        assert!(engine.is_started() && engine.is_running());
        assert_eq!(engine.start(), Err(EngineError::State(StateError::AlreadyStarted)));

        engine.stop().unwrap();
        assert!(engine.is_started() && !engine.is_running());
        assert_eq!(engine.master_gain(), 0.0);
        renderer.sync();
        assert_eq!(renderer.graph().master_gain(), 0.0);

        engine.resume().unwrap();
        assert!(engine.is_running());
        renderer.sync();
        assert_eq!(renderer.graph().master_gain(), 1.0);
    }

    #[test]
    fn stop_resume_never_restarts_oscillators() {
        let (mut engine, mut renderer) = engine_with(VoiceConfig::default());
        engine.start().unwrap();
        for _ in 0..5 {
            engine.stop().unwrap();
            engine.resume().unwrap();
        }
        let _ = engine.start();
        renderer.sync();
        for i in 0..VOICE_COUNT {
            assert_eq!(renderer.graph().oscillator_starts(i), 1);
        }
    }

    #[test]
    fn single_fader_reapplies_mirror() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameter(6, 1.0);
        assert_eq!(engine.filter_cutoff_hz(), 400.0);
        assert_eq!(engine.active_glides(), 6);

        engine.set_parameter(0, 1.0);
        assert_eq!(engine.voice(0).unwrap().pitch_target_hz(), 880.0);
        assert_eq!(engine.voice(1).unwrap().pitch_target_hz(), quantize(0.5, 440.0));
        assert_eq!(engine.parameters()[0], 1.0);

        engine.set_parameter(42, 1.0);
        assert_eq!(engine.parameters().len(), PARAMETER_COUNT);
    }

    #[test]
    fn out_of_band_values_are_not_clamped() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameters(&[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 3.0]);
        assert_eq!(engine.voice(0).unwrap().lfo_target_hz(), 2.0 * 999.0 + 1.0);
        assert_eq!(engine.filter_cutoff_hz(), 1000.0);
    }

    #[test]
    fn non_finite_slots_leave_targets_alone() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        let cutoff = engine.filter_cutoff_hz();

        engine.set_parameters(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, f64::NAN]);
        assert_eq!(engine.filter_cutoff_hz(), cutoff);
        assert_eq!(engine.parameters()[6], FADER_DEFAULT);
        assert_eq!(engine.active_glides(), 6);
        engine.tick(1000.0);

        engine.set_parameters(&[f64::NAN, 1.0, f64::NAN, f64::NAN, 0.0, f64::INFINITY, 0.2]);
        assert_eq!(engine.voice(0).unwrap().pitch_target_hz(), quantize(0.5, 440.0));
        assert_eq!(engine.voice(1).unwrap().pitch_target_hz(), 880.0);
        assert!(!engine.voice(0).unwrap().is_gliding(GlideKind::LfoRate));
        assert_eq!(engine.voice(1).unwrap().lfo_target_hz(), 1.0);
        assert_eq!(engine.filter_cutoff_hz(), 160.0);
        assert!(engine.parameters().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn overflowing_targets_are_skipped() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        let cutoff = engine.filter_cutoff_hz();
        let lfo = engine.voice(0).unwrap().lfo_target_hz();

        engine.set_parameters(&[0.5, 0.5, 0.5, 1e306, 0.5, 0.5, 1e308]);
        assert!(!engine.voice(0).unwrap().is_gliding(GlideKind::LfoRate));
        assert_eq!(engine.voice(0).unwrap().lfo_target_hz(), lfo);
        assert_eq!(engine.filter_cutoff_hz(), cutoff);
    }

    #[test]
    fn non_finite_fader_value_is_ignored() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.set_parameter(2, f64::NAN);
        assert_eq!(engine.parameters(), &[FADER_DEFAULT; PARAMETER_COUNT]);
        assert_eq!(engine.active_glides(), 0);
    }

    #[test]
    fn non_finite_ticks_leave_clock_alone() {
        let (mut engine, _renderer) = engine_with(glide_config(10.0));
        engine.tick(f64::INFINITY);
        engine.tick(f64::NAN);
        engine.tick_to(f64::INFINITY);
        assert_eq!(engine.now_ms(), 0.0);

        // A glide after the bad ticks still takes its full length.
        engine.set_parameters(&[1.0]);
        engine.tick(990.0);
        assert!(engine.voice(0).unwrap().is_gliding(GlideKind::Pitch));
        engine.tick(10.0);
        assert_eq!(engine.voice(0).unwrap().pitch_hz(), 880.0);
    }

    #[test]
    fn dispose_cancels_glides_and_silences_renderer() {
        let (mut engine, mut renderer) = engine_with(glide_config(10.0));
        engine.start().unwrap();
        engine.set_parameters(&[0.3; 7]);
        engine.dispose();

        let mut out = vec![1.0f32; 256];
        renderer.render(&mut out);
        assert!(renderer.is_closed());
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
