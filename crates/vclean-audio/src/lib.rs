#![deny(unreachable_patterns)]
//! Speech track cleanup on decoded audio.
//!
//! This crate provides:
//! - A planar in-memory `Waveform` with explicit 16-bit PCM conversion
//! - Speech gating from externally detected speech intervals
//! - Feed-forward dynamics compression with attack/release smoothing,
//!   soft knee and peak normalization
//! - An in-memory pipeline chaining the two with an optional external stage
//!
//! Decoding, voice-activity detection, filtering and muxing are left to the
//! caller; every operation here is a pure function over resident buffers.

pub mod dynamics;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod speech_gate;
pub mod units;
pub mod waveform;

pub use dynamics::{compress, CompressedAudio, DynamicsCompressor};
pub use error::{AudioError, AudioResult};
pub use pipeline::{CleanupReport, SpeechCleanup, StageTiming, WaveformStage};
pub use speech_gate::{gate, GateStats, GatedAudio, SpeechGate};
pub use waveform::Waveform;

// Model re-exports so callers need a single dependency.
pub use vclean_models::{
    parse_speech_timestamps, CompressorConfig, ConfigError, GateConfig, SampleFormat,
    SpeechInterval,
};
