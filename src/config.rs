//! Voice configuration supplied by the settings form.
//!
//! The settings collaborator delivers a full config once at construction and
//! again on every save. The engine keeps the last config that validated as a
//! versioned [`ConfigSnapshot`]; a rejected install never replaces it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Frequency of scale degree 0.
    pub base_frequency_hz: f64,
    pub waveform: Waveform,
    pub lfo_min_hz: f64,
    pub lfo_max_hz: f64,
    /// Tick period of a glide; a full glide is 100 ticks.
    pub glide_time_ms: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            base_frequency_hz: 440.0,
            waveform: Waveform::Sawtooth,
            lfo_min_hz: 1.0,
            lfo_max_hz: 1000.0,
            glide_time_ms: 0.0,
        }
    }
}

/// Wire shape with every field optional, so absent fields can be named.
///
/// Every way a config enters the crate (JSON text or a JS object) lands
/// here first, so they all accept and reject the same inputs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartialVoiceConfig {
    base_frequency_hz: Option<f64>,
    waveform: Option<String>,
    lfo_min_hz: Option<f64>,
    lfo_max_hz: Option<f64>,
    glide_time_ms: Option<f64>,
}

impl PartialVoiceConfig {
    /// Fill in a config, naming the first absent field, then validate it.
    pub(crate) fn resolve(self) -> Result<VoiceConfig, ConfigError> {
        let config = VoiceConfig {
            base_frequency_hz: self
                .base_frequency_hz
                .ok_or(ConfigError::MissingField("baseFrequencyHz"))?,
            waveform: self
                .waveform
                .ok_or(ConfigError::MissingField("waveform"))?
                .parse()?,
            lfo_min_hz: self
                .lfo_min_hz
                .ok_or(ConfigError::MissingField("lfoMinHz"))?,
            lfo_max_hz: self
                .lfo_max_hz
                .ok_or(ConfigError::MissingField("lfoMaxHz"))?,
            glide_time_ms: self
                .glide_time_ms
                .ok_or(ConfigError::MissingField("glideTimeMs"))?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl VoiceConfig {
    /// Parse and validate a config delivered as JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let partial: PartialVoiceConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        partial.resolve()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_frequency_hz.is_finite() && self.base_frequency_hz > 0.0) {
            return Err(ConfigError::NonPositiveBaseFrequency(self.base_frequency_hz));
        }
        for bound in [self.lfo_min_hz, self.lfo_max_hz] {
            if !(bound.is_finite() && bound > 0.0) {
                return Err(ConfigError::NonPositiveLfoFrequency(bound));
            }
        }
        if self.lfo_min_hz > self.lfo_max_hz {
            return Err(ConfigError::InvalidLfoRange {
                min: self.lfo_min_hz,
                max: self.lfo_max_hz,
            });
        }
        if !(self.glide_time_ms.is_finite() && self.glide_time_ms >= 0.0) {
            return Err(ConfigError::NegativeGlideTime(self.glide_time_ms));
        }
        Ok(())
    }

    /// Map a normalized control value onto the LFO band.
    pub fn lfo_rate(&self, normalized: f64) -> f64 {
        normalized * (self.lfo_max_hz - self.lfo_min_hz) + self.lfo_min_hz
    }
}

/// An immutable, versioned view of the installed config.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    version: u64,
    config: Arc<VoiceConfig>,
}

impl ConfigSnapshot {
    /// First snapshot. The config must already be valid.
    pub fn initial(config: VoiceConfig) -> Self {
        ConfigSnapshot {
            version: 0,
            config: Arc::new(config),
        }
    }

    /// The snapshot that replaces this one.
    pub fn succeed(&self, config: VoiceConfig) -> Self {
        ConfigSnapshot {
            version: self.version + 1,
            config: Arc::new(config),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn shared(&self) -> Arc<VoiceConfig> {
        Arc::clone(&self.config)
    }
}
