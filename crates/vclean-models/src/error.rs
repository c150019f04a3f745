//! Configuration error types.

use thiserror::Error;

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised when a configuration or interval is rejected.
///
/// Validation always happens before any sample is touched, so a
/// `ConfigError` never leaves a partially processed buffer behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Compression ratio must be greater than 1, got {0}")]
    InvalidRatio(f64),

    #[error("Attack time must be positive, got {0} seconds")]
    InvalidAttack(f64),

    #[error("Release time must be positive, got {0} seconds")]
    InvalidRelease(f64),

    #[error("Knee width must not be negative, got {0} dB")]
    InvalidKnee(f64),

    #[error("Parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Invalid speech interval [{start}, {end})")]
    InvalidInterval { start: f64, end: f64 },

    #[error("Invalid timestamp payload: {0}")]
    InvalidTimestamps(String),
}

impl ConfigError {
    /// Create a non-finite parameter error.
    pub fn non_finite(name: &'static str, value: f64) -> Self {
        Self::NonFinite { name, value }
    }
}

/// Reject NaN and infinities for a named parameter.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::non_finite(name, value))
    }
}
