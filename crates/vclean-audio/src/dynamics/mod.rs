//! Dynamics compression.
//!
//! Per-channel envelope follower with attack/release smoothing and a soft
//! knee, followed by a single peak-normalization pass over the whole
//! buffer.
//!
//! # Usage
//!
//! ```rust
//! use vclean_audio::{dynamics, Waveform};
//! use vclean_models::CompressorConfig;
//!
//! let waveform = Waveform::mono(vec![0.9, -0.5, 0.2, 0.0], 8000).unwrap();
//! let out = dynamics::compress(&waveform, &CompressorConfig::speech()).unwrap();
//! assert_eq!(out.peak(), 32767.0);
//! ```

mod compressor;
mod envelope;
mod normalize;

pub use compressor::{compress, CompressedAudio, DynamicsCompressor};
pub use envelope::{gain_trace, EnvelopeCoefficients};
pub use normalize::normalize_peak;
