//! Output sample formats and their full-scale values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full-scale magnitude of 16-bit signed PCM.
pub const S16_FULL_SCALE: f32 = i16::MAX as f32;

/// Full-scale magnitude of 32-bit float PCM.
pub const F32_FULL_SCALE: f32 = 1.0;

/// Sample format a processed buffer is normalized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 16-bit signed integer PCM.
    #[default]
    S16,
    /// 32-bit float PCM in `[-1.0, 1.0]`.
    F32,
}

impl SampleFormat {
    /// Maximum representable magnitude for this format.
    pub fn full_scale(self) -> f32 {
        match self {
            SampleFormat::S16 => S16_FULL_SCALE,
            SampleFormat::F32 => F32_FULL_SCALE,
        }
    }

    /// Parse a format name (`"s16"` or `"f32"`, case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "s16" | "i16" | "pcm_s16le" => Some(SampleFormat::S16),
            "f32" | "pcm_f32le" => Some(SampleFormat::F32),
            _ => None,
        }
    }
}
