//! Dynamics compressor configuration.
//!
//! A `CompressorConfig` is built once per invocation and never mutated by
//! the processing code. `validate()` is called before the first sample is
//! read, so an invalid config cannot be partially applied.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::env::env_or;
use crate::error::{ensure_finite, ConfigError, ConfigResult};
use crate::sample_format::SampleFormat;

/// Default threshold (dBFS).
pub const DEFAULT_THRESHOLD_DB: f64 = -10.0;
/// Default compression ratio (4:1).
pub const DEFAULT_RATIO: f64 = 4.0;
/// Default attack time (seconds).
pub const DEFAULT_ATTACK_SECONDS: f64 = 0.02;
/// Default release time (seconds).
pub const DEFAULT_RELEASE_SECONDS: f64 = 0.1;
/// Default knee width (dB).
pub const DEFAULT_KNEE_DB: f64 = 5.0;
/// Default makeup gain (dB).
pub const DEFAULT_MAKEUP_GAIN_DB: f64 = 0.0;

/// Feed-forward compressor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompressorConfig {
    /// Level above which gain reduction starts (dBFS, usually negative).
    #[serde(default = "default_threshold_db")]
    pub threshold_db: f64,

    /// Input:output slope above the threshold. Must be greater than 1.
    #[serde(default = "default_ratio")]
    pub ratio: f64,

    /// Time constant for gain decreasing into compression (seconds).
    #[serde(default = "default_attack_seconds")]
    pub attack_seconds: f64,

    /// Time constant for gain recovering towards unity (seconds).
    #[serde(default = "default_release_seconds")]
    pub release_seconds: f64,

    /// Width of the soft-knee region centred on the threshold.
    ///
    /// 0 gives a hard knee.
    #[serde(default = "default_knee_db")]
    pub knee_db: f64,

    /// Fixed gain applied after compression (dB, either sign).
    #[serde(default = "default_makeup_gain_db")]
    pub makeup_gain_db: f64,

    /// Format whose full scale the output is peak-normalized to.
    #[serde(default)]
    pub output_format: SampleFormat,
}

fn default_threshold_db() -> f64 {
    DEFAULT_THRESHOLD_DB
}
fn default_ratio() -> f64 {
    DEFAULT_RATIO
}
fn default_attack_seconds() -> f64 {
    DEFAULT_ATTACK_SECONDS
}
fn default_release_seconds() -> f64 {
    DEFAULT_RELEASE_SECONDS
}
fn default_knee_db() -> f64 {
    DEFAULT_KNEE_DB
}
fn default_makeup_gain_db() -> f64 {
    DEFAULT_MAKEUP_GAIN_DB
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self::speech()
    }
}

impl CompressorConfig {
    /// Balanced settings for spoken word: -10 dB threshold, 4:1, 20 ms
    /// attack, 100 ms release, 5 dB knee.
    pub fn speech() -> Self {
        Self {
            threshold_db: DEFAULT_THRESHOLD_DB,
            ratio: DEFAULT_RATIO,
            attack_seconds: DEFAULT_ATTACK_SECONDS,
            release_seconds: DEFAULT_RELEASE_SECONDS,
            knee_db: DEFAULT_KNEE_DB,
            makeup_gain_db: DEFAULT_MAKEUP_GAIN_DB,
            output_format: SampleFormat::S16,
        }
    }

    /// Light levelling that leaves most transients alone.
    pub fn gentle() -> Self {
        Self {
            threshold_db: -18.0,
            ratio: 2.0,
            attack_seconds: 0.03,
            release_seconds: 0.25,
            knee_db: 6.0,
            ..Self::speech()
        }
    }

    /// Heavy levelling for very uneven recordings.
    pub fn aggressive() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 8.0,
            attack_seconds: 0.005,
            release_seconds: 0.05,
            knee_db: 2.0,
            ..Self::speech()
        }
    }

    /// Create config from environment variables.
    ///
    /// Reads `VCLEAN_COMPRESSOR_THRESHOLD_DB`, `VCLEAN_COMPRESSOR_RATIO`,
    /// `VCLEAN_COMPRESSOR_ATTACK`, `VCLEAN_COMPRESSOR_RELEASE`,
    /// `VCLEAN_COMPRESSOR_KNEE_DB`, `VCLEAN_COMPRESSOR_MAKEUP_DB` and
    /// `VCLEAN_OUTPUT_FORMAT`, falling back to [`CompressorConfig::speech`]
    /// per field. The result is not validated here.
    pub fn from_env() -> Self {
        let defaults = Self::speech();
        Self {
            threshold_db: env_or("VCLEAN_COMPRESSOR_THRESHOLD_DB", defaults.threshold_db),
            ratio: env_or("VCLEAN_COMPRESSOR_RATIO", defaults.ratio),
            attack_seconds: env_or("VCLEAN_COMPRESSOR_ATTACK", defaults.attack_seconds),
            release_seconds: env_or("VCLEAN_COMPRESSOR_RELEASE", defaults.release_seconds),
            knee_db: env_or("VCLEAN_COMPRESSOR_KNEE_DB", defaults.knee_db),
            makeup_gain_db: env_or("VCLEAN_COMPRESSOR_MAKEUP_DB", defaults.makeup_gain_db),
            output_format: std::env::var("VCLEAN_OUTPUT_FORMAT")
                .ok()
                .and_then(|s| SampleFormat::parse(&s))
                .unwrap_or(defaults.output_format),
        }
    }

    /// Check every parameter.
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_finite("threshold_db", self.threshold_db)?;
        ensure_finite("ratio", self.ratio)?;
        ensure_finite("attack_seconds", self.attack_seconds)?;
        ensure_finite("release_seconds", self.release_seconds)?;
        ensure_finite("knee_db", self.knee_db)?;
        ensure_finite("makeup_gain_db", self.makeup_gain_db)?;

        if self.ratio <= 1.0 {
            return Err(ConfigError::InvalidRatio(self.ratio));
        }
        if self.attack_seconds <= 0.0 {
            return Err(ConfigError::InvalidAttack(self.attack_seconds));
        }
        if self.release_seconds <= 0.0 {
            return Err(ConfigError::InvalidRelease(self.release_seconds));
        }
        if self.knee_db < 0.0 {
            return Err(ConfigError::InvalidKnee(self.knee_db));
        }

        Ok(())
    }

    /// Builder-style setter for threshold.
    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Builder-style setter for ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Builder-style setter for attack time.
    pub fn with_attack_seconds(mut self, seconds: f64) -> Self {
        self.attack_seconds = seconds;
        self
    }

    /// Builder-style setter for release time.
    pub fn with_release_seconds(mut self, seconds: f64) -> Self {
        self.release_seconds = seconds;
        self
    }

    /// Builder-style setter for knee width.
    pub fn with_knee_db(mut self, knee_db: f64) -> Self {
        self.knee_db = knee_db;
        self
    }

    /// Builder-style setter for makeup gain.
    pub fn with_makeup_gain_db(mut self, makeup_gain_db: f64) -> Self {
        self.makeup_gain_db = makeup_gain_db;
        self
    }

    /// Builder-style setter for the normalization target format.
    pub fn with_output_format(mut self, format: SampleFormat) -> Self {
        self.output_format = format;
        self
    }
}
