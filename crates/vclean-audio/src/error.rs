//! Error types for audio processing.

use thiserror::Error;
use vclean_models::ConfigError;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while gating or compressing a waveform.
///
/// Every variant is raised before the output buffer is handed back, so a
/// failed call never returns partially processed audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Waveform has no channels")]
    NoChannels,

    #[error("Waveform has no samples")]
    NoSamples,

    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Interleaved buffer of {len} samples does not divide into {channels} channels")]
    InterleavedLength { len: usize, channels: usize },

    #[error("Non-finite sample in channel {channel} at frame {frame}")]
    NonFiniteSample { channel: usize, frame: usize },

    #[error("Gain stage overflowed in channel {channel} at frame {frame}")]
    GainOverflow { channel: usize, frame: usize },

    #[error("Stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl AudioError {
    /// Create a stage failure error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a rejected configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, AudioError::Config(_))
    }

    /// Whether this error came from a malformed waveform.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            AudioError::NoChannels
                | AudioError::NoSamples
                | AudioError::ChannelLengthMismatch { .. }
                | AudioError::InvalidSampleRate(_)
                | AudioError::InterleavedLength { .. }
                | AudioError::NonFiniteSample { .. }
        )
    }
}
