//! Conversion of speech intervals into clamped sample spans.
//!
//! ```text
//!   seconds ──► pad ──► round(secs * rate) ──► clamp [0, frames] ──► drop empty ──► sort + merge
//! ```

use tracing::debug;
use vclean_models::{GateConfig, SpeechInterval};

use crate::waveform::Waveform;

/// Half-open range of frame indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SampleSpan {
    /// First frame (inclusive).
    pub start: usize,
    /// Last frame (exclusive).
    pub end: usize,
}

impl SampleSpan {
    /// Number of frames in the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no frames.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether a frame index lies inside the span.
    pub fn contains(&self, frame: usize) -> bool {
        frame >= self.start && frame < self.end
    }
}

/// The spans of a waveform that a set of speech intervals keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTimeline {
    spans: Vec<SampleSpan>,
    retained: usize,
    dropped: usize,
    num_frames: usize,
    merged: bool,
}

impl SpeechTimeline {
    /// Build the timeline of `intervals` against `waveform`.
    ///
    /// Every interval is padded per `config`, converted to frame indices
    /// with `round(secs * sample_rate)` and clamped to the waveform. Spans
    /// that end up empty are dropped and counted. Order of `intervals`
    /// does not matter.
    pub fn build(intervals: &[SpeechInterval], waveform: &Waveform, config: &GateConfig) -> Self {
        let pre = config.pre_padding_secs();
        let post = config.post_padding_secs();

        let mut spans = Vec::with_capacity(intervals.len());
        let mut dropped = 0usize;

        for interval in intervals {
            let padded = interval.padded(pre, post);
            let span = SampleSpan {
                start: waveform.seconds_to_frame(padded.start_secs),
                end: waveform.seconds_to_frame(padded.end_secs),
            };

            if span.is_empty() {
                debug!(
                    start_secs = interval.start_secs,
                    end_secs = interval.end_secs,
                    "Dropping speech interval outside waveform bounds"
                );
                dropped += 1;
                continue;
            }

            spans.push(span);
        }

        let retained = spans.len();
        if config.merge_overlapping {
            spans = merge_spans(spans);
        }

        Self {
            spans,
            retained,
            dropped,
            num_frames: waveform.num_frames(),
            merged: config.merge_overlapping,
        }
    }

    /// Spans to copy, merged and sorted when merging is enabled.
    pub fn spans(&self) -> &[SampleSpan] {
        &self.spans
    }

    /// Intervals that survived clamping (counted before merging).
    pub fn retained_intervals(&self) -> usize {
        self.retained
    }

    /// Intervals dropped because they were empty after clamping.
    pub fn dropped_intervals(&self) -> usize {
        self.dropped
    }

    /// Total frames of the waveform the timeline was built against.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Number of distinct frames covered by at least one span.
    pub fn covered_frames(&self) -> usize {
        if self.merged {
            self.spans.iter().map(SampleSpan::len).sum()
        } else {
            merge_spans(self.spans.clone())
                .iter()
                .map(SampleSpan::len)
                .sum()
        }
    }

    /// Whether a frame is kept by the gate.
    pub fn is_kept(&self, frame: usize) -> bool {
        self.spans.iter().any(|span| span.contains(frame))
    }
}

/// Sort spans and merge any that overlap or touch.
pub fn merge_spans(mut spans: Vec<SampleSpan>) -> Vec<SampleSpan> {
    spans.sort_unstable();

    let mut merged: Vec<SampleSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}
