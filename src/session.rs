//! A control thread and a render thread folded into one owner.
//!
//! Browser hosts and offline bounces have no second thread to hand the
//! [`Renderer`] to, so the session alternates: tick the engine's clock by one
//! control step, then render the frames that step covers.

use rand::Rng;

use crate::config::VoiceConfig;
use crate::dsp::context::{AudioContext, Renderer};
use crate::dsp::wav;
use crate::engine::AudioEngine;
use crate::error::EngineError;
use crate::timer::MIN_TICK_INTERVAL_MS;

pub struct SynthSession {
    engine: AudioEngine,
    renderer: Renderer,
    sample_rate: f64,
}

impl SynthSession {
    pub fn new(sample_rate: f64, config: VoiceConfig) -> Result<Self, EngineError> {
        let (context, renderer) = AudioContext::new(sample_rate)?;
        let engine = AudioEngine::new(context, config)?;
        Ok(Self::from_parts(engine, renderer, sample_rate))
    }

    pub fn with_rng<R: Rng>(
        sample_rate: f64,
        config: VoiceConfig,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let (context, renderer) = AudioContext::new(sample_rate)?;
        let engine = AudioEngine::with_rng(context, config, rng)?;
        Ok(Self::from_parts(engine, renderer, sample_rate))
    }

    fn from_parts(engine: AudioEngine, renderer: Renderer, sample_rate: f64) -> Self {
        SynthSession {
            engine,
            renderer,
            sample_rate,
        }
    }

    /// Run `duration_ms` of control time and return the interleaved stereo
    /// audio it produced. A duration that is not finite renders nothing.
    pub fn advance(&mut self, duration_ms: f64, control_step_ms: f64) -> Vec<f32> {
        if !duration_ms.is_finite() {
            log::warn!(target: "synth::engine", "advance by {duration_ms} ms ignored");
            return Vec::new();
        }
        let step_ms = if control_step_ms.is_finite() && control_step_ms > 0.0 {
            control_step_ms
        } else {
            MIN_TICK_INTERVAL_MS
        };
        let end_ms = self.engine.now_ms() + duration_ms.max(0.0);
        let mut out = Vec::new();

        while self.engine.now_ms() < end_ms {
            let slice_end = (self.engine.now_ms() + step_ms).min(end_ms);
            self.engine.tick_to(slice_end);

            // Frame count follows the clock so rounding never accumulates.
            let due = (self.engine.now_ms() * self.sample_rate / 1000.0).round() as u64;
            let frames = due.saturating_sub(self.renderer.frames_rendered()) as usize;
            if frames > 0 {
                let start = out.len();
                out.resize(start + frames * 2, 0.0);
                self.renderer.render(&mut out[start..]);
            }
        }
        out
    }

    /// Render exactly `frames` frames, first running every control tick the
    /// block spans. This is the shape an audio callback asks for.
    pub fn render_frames(&mut self, frames: usize) -> Vec<f32> {
        let end = self.renderer.frames_rendered() + frames as u64;
        self.engine.tick_to(end as f64 * 1000.0 / self.sample_rate);

        let mut out = vec![0.0; frames * 2];
        self.renderer.render(&mut out);
        out
    }

    /// [`advance`](Self::advance) encoded as a WAV file.
    pub fn bounce_wav(&mut self, duration_ms: f64, control_step_ms: f64) -> Vec<u8> {
        let samples = self.advance(duration_ms, control_step_ms);
        wav::render_wav(&samples, self.sample_rate as u32)
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AudioEngine {
        &mut self.engine
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Dispose the engine. The renderer stays behind and renders silence.
    pub fn dispose(self) -> Renderer {
        self.engine.dispose();
        self.renderer
    }
}
