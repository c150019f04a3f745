//! Speech intervals produced by an external voice-activity detector.
//!
//! Intervals are expressed in seconds. The detector is probabilistic, so
//! the processing side tolerates intervals that are unsorted, overlapping
//! or that run past the end of the audio; it clamps rather than rejects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ConfigError, ConfigResult};

/// A time range, in seconds, judged to contain speech.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechInterval {
    /// Start time in seconds (inclusive).
    pub start_secs: f64,
    /// End time in seconds (exclusive).
    pub end_secs: f64,
}

impl SpeechInterval {
    /// Create a validated interval.
    ///
    /// Requires `0 <= start < end` with both bounds finite.
    pub fn new(start_secs: f64, end_secs: f64) -> ConfigResult<Self> {
        ensure_finite("start_secs", start_secs)?;
        ensure_finite("end_secs", end_secs)?;

        if start_secs < 0.0 || end_secs <= start_secs {
            return Err(ConfigError::InvalidInterval {
                start: start_secs,
                end: end_secs,
            });
        }

        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    /// Create an interval without validation.
    ///
    /// Use this for raw detector output; the gate clamps every interval to
    /// the waveform bounds and drops the ones that end up empty.
    pub fn unchecked(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Create a validated interval from millisecond bounds.
    pub fn from_millis(start_ms: u64, end_ms: u64) -> ConfigResult<Self> {
        Self::new(start_ms as f64 / 1000.0, end_ms as f64 / 1000.0)
    }

    /// Duration in seconds (zero for inverted intervals).
    pub fn duration_secs(&self) -> f64 {
        (self.end_secs - self.start_secs).max(0.0)
    }

    /// Return a copy widened by the given padding on each side.
    ///
    /// The start is not clamped here; clamping happens against the
    /// waveform the interval is applied to.
    pub fn padded(&self, pre_secs: f64, post_secs: f64) -> Self {
        Self {
            start_secs: self.start_secs - pre_secs,
            end_secs: self.end_secs + post_secs,
        }
    }
}

/// Speech timestamp as emitted by the VAD provider: `{"start": s, "end": e}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechTimestamp {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl From<SpeechTimestamp> for SpeechInterval {
    fn from(ts: SpeechTimestamp) -> Self {
        SpeechInterval::unchecked(ts.start, ts.end)
    }
}

impl From<(f64, f64)> for SpeechInterval {
    fn from((start, end): (f64, f64)) -> Self {
        SpeechInterval::unchecked(start, end)
    }
}

/// Parse a JSON array of VAD timestamps into speech intervals.
///
/// The intervals are returned as-is (unchecked); bounds are clamped later
/// against the waveform they gate.
///
/// # Examples
/// ```
/// use vclean_models::parse_speech_timestamps;
/// let intervals = parse_speech_timestamps(r#"[{"start": 0.5, "end": 1.25}]"#).unwrap();
/// assert_eq!(intervals.len(), 1);
/// assert_eq!(intervals[0].end_secs, 1.25);
/// ```
pub fn parse_speech_timestamps(json: &str) -> ConfigResult<Vec<SpeechInterval>> {
    let timestamps: Vec<SpeechTimestamp> =
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidTimestamps(e.to_string()))?;

    Ok(timestamps.into_iter().map(SpeechInterval::from).collect())
}
