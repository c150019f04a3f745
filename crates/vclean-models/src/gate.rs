//! Configuration for the speech gate.
//!
//! The defaults reproduce plain interval gating: no padding around the
//! detector's intervals, overlapping intervals merged before copying.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::env::env_or;

/// Default padding before each speech interval (milliseconds).
pub const DEFAULT_PRE_PADDING_MS: u64 = 0;
/// Default padding after each speech interval (milliseconds).
pub const DEFAULT_POST_PADDING_MS: u64 = 0;

/// Configuration for gating a waveform to its speech intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GateConfig {
    /// Audio kept before each interval starts (milliseconds).
    ///
    /// Keeps word onsets the detector clipped. 0 keeps the detector's
    /// boundary as-is.
    #[serde(default = "default_pre_padding_ms")]
    pub pre_padding_ms: u64,

    /// Audio kept after each interval ends (milliseconds).
    #[serde(default = "default_post_padding_ms")]
    pub post_padding_ms: u64,

    /// Sort and merge overlapping intervals before copying.
    ///
    /// Gated output is identical either way; merging only avoids copying
    /// the same samples twice.
    #[serde(default = "default_merge_overlapping")]
    pub merge_overlapping: bool,
}

fn default_pre_padding_ms() -> u64 {
    DEFAULT_PRE_PADDING_MS
}
fn default_post_padding_ms() -> u64 {
    DEFAULT_POST_PADDING_MS
}
fn default_merge_overlapping() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            pre_padding_ms: DEFAULT_PRE_PADDING_MS,
            post_padding_ms: DEFAULT_POST_PADDING_MS,
            merge_overlapping: true,
        }
    }
}

impl GateConfig {
    /// Create config from environment variables.
    ///
    /// Reads `VCLEAN_GATE_PRE_PADDING_MS`, `VCLEAN_GATE_POST_PADDING_MS` and
    /// `VCLEAN_GATE_MERGE`; unset or unparsable values keep their default.
    pub fn from_env() -> Self {
        Self {
            pre_padding_ms: env_or("VCLEAN_GATE_PRE_PADDING_MS", DEFAULT_PRE_PADDING_MS),
            post_padding_ms: env_or("VCLEAN_GATE_POST_PADDING_MS", DEFAULT_POST_PADDING_MS),
            merge_overlapping: env_or("VCLEAN_GATE_MERGE", true),
        }
    }

    /// Builder-style setter for pre-speech padding.
    pub fn with_pre_padding_ms(mut self, ms: u64) -> Self {
        self.pre_padding_ms = ms;
        self
    }

    /// Builder-style setter for post-speech padding.
    pub fn with_post_padding_ms(mut self, ms: u64) -> Self {
        self.post_padding_ms = ms;
        self
    }

    /// Builder-style setter for interval merging.
    pub fn with_merge_overlapping(mut self, merge: bool) -> Self {
        self.merge_overlapping = merge;
        self
    }

    /// Pre-speech padding in seconds.
    pub fn pre_padding_secs(&self) -> f64 {
        self.pre_padding_ms as f64 / 1000.0
    }

    /// Post-speech padding in seconds.
    pub fn post_padding_secs(&self) -> f64 {
        self.post_padding_ms as f64 / 1000.0
    }

    /// Whether any padding is configured.
    pub fn has_padding(&self) -> bool {
        self.pre_padding_ms > 0 || self.post_padding_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.pre_padding_ms, 0);
        assert_eq!(config.post_padding_ms, 0);
        assert!(config.merge_overlapping);
        assert!(!config.has_padding());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GateConfig::default()
            .with_pre_padding_ms(200)
            .with_post_padding_ms(150)
            .with_merge_overlapping(false);

        assert!((config.pre_padding_secs() - 0.2).abs() < 1e-12);
        assert!((config.post_padding_secs() - 0.15).abs() < 1e-12);
        assert!(!config.merge_overlapping);
        assert!(config.has_padding());
    }

    #[test]
    fn test_serde_defaults() {
        let config: GateConfig = serde_json::from_str(r#"{"pre_padding_ms": 30}"#).unwrap();
        assert_eq!(config.pre_padding_ms, 30);
        assert_eq!(config.post_padding_ms, 0);
        assert!(config.merge_overlapping);
    }
}
