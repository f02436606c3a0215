pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod glide;
pub mod scale;
pub mod session;
pub mod timer;
pub mod voice;

use crate::config::{PartialVoiceConfig, VoiceConfig};
use crate::error::{ConfigError, EngineError};
use crate::session::SynthSession;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of simultaneous voices.
pub const VOICE_COUNT: usize = 3;
/// Length of a full parameter vector: a pitch and an LFO rate per voice,
/// plus the global filter.
pub const PARAMETER_COUNT: usize = 2 * VOICE_COUNT + 1;

/// Control step used for offline bounces.
const BOUNCE_STEP_MS: f64 = 4.0;

/// WASM-exposed: return the timbrepad-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Render `duration_ms` of a started engine holding `vector`, as a WAV file.
pub fn bounce(
    config: VoiceConfig,
    vector: &[f64],
    duration_ms: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, EngineError> {
    let mut session = SynthSession::new(sample_rate as f64, config)?;
    session.engine_mut().start()?;
    session.engine_mut().set_parameters(vector);
    Ok(session.bounce_wav(duration_ms, BOUNCE_STEP_MS))
}

/// WASM-exposed: [`bounce`] with the config given as a JS object.
#[wasm_bindgen]
pub fn bounce_wav(
    config: JsValue,
    vector: Vec<f64>,
    duration_ms: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let config = config_from_js(config)?;
    bounce(config, &vector, duration_ms, sample_rate).map_err(to_js)
}

/// A JS config object goes through the same partial shape as JSON text, so
/// aliases and missing-field errors match `installConfigJson`.
fn config_from_js(value: JsValue) -> Result<VoiceConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(VoiceConfig::default());
    }
    let partial: PartialVoiceConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js(ConfigError::Malformed(e.to_string()).into()))?;
    partial.resolve().map_err(|e| to_js(e.into()))
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed synth: engine and renderer in one object, for hosts that
/// pull audio from an AudioWorklet.
#[wasm_bindgen]
pub struct TimbreSynth {
    session: SynthSession,
}

#[wasm_bindgen]
impl TimbreSynth {
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64, config: JsValue) -> Result<TimbreSynth, JsValue> {
        let config = config_from_js(config)?;
        let session = SynthSession::new(sample_rate, config).map_err(to_js)?;
        Ok(TimbreSynth { session })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.session.engine_mut().start().map_err(to_js)
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.session.engine_mut().stop().map_err(to_js)
    }

    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.session.engine_mut().resume().map_err(to_js)
    }

    #[wasm_bindgen(js_name = setParameters)]
    pub fn set_parameters(&mut self, vector: Vec<f64>) {
        self.session.engine_mut().set_parameters(&vector);
    }

    #[wasm_bindgen(js_name = setParameter)]
    pub fn set_parameter(&mut self, index: usize, value: f64) {
        self.session.engine_mut().set_parameter(index, value);
    }

    #[wasm_bindgen(js_name = installConfig)]
    pub fn install_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config = config_from_js(config)?;
        self.session.engine_mut().install_config(config).map_err(to_js)
    }

    #[wasm_bindgen(js_name = installConfigJson)]
    pub fn install_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.session.engine_mut().install_config_json(json).map_err(to_js)
    }

    /// Advance control time without rendering.
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.session.engine_mut().tick(elapsed_ms);
    }

    /// Render one block of interleaved stereo.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.session.render_frames(frames)
    }

    #[wasm_bindgen(js_name = isStarted)]
    pub fn is_started(&self) -> bool {
        self.session.engine().is_started()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.engine().is_running()
    }

    pub fn parameters(&self) -> Vec<f64> {
        self.session.engine().parameters().to_vec()
    }

    #[wasm_bindgen(js_name = filterCutoffHz)]
    pub fn filter_cutoff_hz(&self) -> f64 {
        self.session.engine().filter_cutoff_hz()
    }

    pub fn dispose(self) {
        self.session.dispose();
    }
}
