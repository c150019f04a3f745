//! Speech gating driven by external VAD intervals.
//!
//! Everything outside the detector's speech intervals is replaced with
//! digital silence; everything inside is copied verbatim.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ VAD intervals│───►│ Timeline     │───►│ Span copy    │
//! │ (seconds)    │    │ (clamp/merge)│    │ onto silence │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use vclean_audio::{speech_gate, Waveform};
//! use vclean_models::SpeechInterval;
//!
//! let waveform = Waveform::mono(vec![1.0; 1000], 1000).unwrap();
//! let gated = speech_gate::gate(&waveform, &[SpeechInterval::unchecked(0.2, 0.8)]).unwrap();
//! assert_eq!(gated.channel(0).unwrap()[100], 0.0);
//! assert_eq!(gated.channel(0).unwrap()[500], 1.0);
//! ```

mod stats;
mod timeline;

pub use stats::{compute_gate_stats, GateStats};
pub use timeline::{merge_spans, SampleSpan, SpeechTimeline};

use tracing::debug;
use vclean_models::{GateConfig, SpeechInterval};

use crate::error::AudioResult;
use crate::waveform::Waveform;

/// Gated audio together with statistics about what was kept.
#[derive(Debug, Clone)]
pub struct GatedAudio {
    /// Output waveform, same shape as the input.
    pub waveform: Waveform,
    /// What the gate kept and dropped.
    pub stats: GateStats,
}

/// Silences everything outside a set of speech intervals.
#[derive(Debug, Clone, Default)]
pub struct SpeechGate {
    config: GateConfig,
}

impl SpeechGate {
    /// Create a gate with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Gate `waveform` to `intervals`.
    ///
    /// The output has the input's length, sample rate and channel count.
    /// Intervals may be unsorted, overlapping or out of bounds; ones that
    /// are empty after clamping are dropped and counted in
    /// [`GateStats::dropped_intervals`]. An empty interval list yields
    /// complete silence.
    pub fn gate(&self, waveform: &Waveform, intervals: &[SpeechInterval]) -> AudioResult<GatedAudio> {
        waveform.ensure_not_empty()?;

        let timeline = SpeechTimeline::build(intervals, waveform, &self.config);
        let mut output = Waveform::silent_like(waveform);

        for (dst, src) in output.channels_mut().iter_mut().zip(waveform.channels()) {
            for span in timeline.spans() {
                dst[span.start..span.end].copy_from_slice(&src[span.start..span.end]);
            }
        }

        let stats = compute_gate_stats(&timeline);

        debug!(
            intervals = intervals.len(),
            spans = timeline.spans().len(),
            dropped = stats.dropped_intervals,
            kept_frames = stats.kept_frames,
            keep_ratio = format!("{:.1}%", stats.keep_ratio * 100.0),
            "Speech gate applied"
        );

        crate::metrics::record_gate(stats.dropped_intervals, stats.keep_ratio);

        Ok(GatedAudio {
            waveform: output,
            stats,
        })
    }
}

/// Gate a waveform with the default configuration.
pub fn gate(waveform: &Waveform, intervals: &[SpeechInterval]) -> AudioResult<Waveform> {
    SpeechGate::default()
        .gate(waveform, intervals)
        .map(|gated| gated.waveform)
}
