use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Config(ConfigError),
    State(StateError),
}

/// A voice configuration that cannot be installed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingField(&'static str),
    NonPositiveBaseFrequency(f64),
    NonPositiveLfoFrequency(f64),
    InvalidLfoRange { min: f64, max: f64 },
    NegativeGlideTime(f64),
    UnknownWaveform(String),
    Malformed(String),
    InvalidSampleRate(f64),
}

/// A transport call that is not valid in the current engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    NotStarted,
    AlreadyStarted,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(e) => write!(f, "Configuration error: {e}"),
            EngineError::State(e) => write!(f, "Invalid state: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(name) => write!(f, "missing field '{name}'"),
            ConfigError::NonPositiveBaseFrequency(hz) => {
                write!(f, "base frequency must be positive, got {hz} Hz")
            }
            ConfigError::NonPositiveLfoFrequency(hz) => {
                write!(f, "LFO bounds must be positive, got {hz} Hz")
            }
            ConfigError::InvalidLfoRange { min, max } => {
                write!(f, "LFO min ({min} Hz) is greater than LFO max ({max} Hz)")
            }
            ConfigError::NegativeGlideTime(ms) => {
                write!(f, "glide time must not be negative, got {ms} ms")
            }
            ConfigError::UnknownWaveform(name) => write!(f, "unknown waveform '{name}'"),
            ConfigError::Malformed(reason) => write!(f, "malformed config: {reason}"),
            ConfigError::InvalidSampleRate(hz) => {
                write!(f, "sample rate must be a finite rate of at least 3000 Hz, got {hz}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NotStarted => write!(f, "engine has not been started"),
            StateError::AlreadyStarted => write!(f, "engine was already started"),
        }
    }
}

impl std::error::Error for StateError {}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

impl From<StateError> for EngineError {
    fn from(e: StateError) -> Self {
        EngineError::State(e)
    }
}
