//! Shared data models for speech track cleanup.
//!
//! This crate provides Serde-serializable types for:
//! - Speech intervals and VAD timestamp payloads
//! - Speech gate configuration
//! - Dynamics compressor configuration
//! - Output sample formats

pub mod compressor;
mod env;
pub mod error;
pub mod gate;
pub mod interval;
pub mod sample_format;

// Re-export common types
pub use compressor::CompressorConfig;
pub use error::{ConfigError, ConfigResult};
pub use gate::GateConfig;
pub use interval::{parse_speech_timestamps, SpeechInterval, SpeechTimestamp};
pub use sample_format::SampleFormat;
