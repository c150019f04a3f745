//! Processing metrics.
//!
//! Records through the `metrics` facade; the library never installs an
//! exporter, so these are no-ops until the host application does.

use std::time::Duration;

use metrics::{counter, histogram};

use crate::units::gain_to_db;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total speech gate runs.
    pub const GATE_RUNS_TOTAL: &str = "vclean_gate_runs_total";

    /// Total speech intervals dropped because they were empty after clamping.
    pub const GATE_INTERVALS_DROPPED_TOTAL: &str = "vclean_gate_intervals_dropped_total";

    /// Fraction of frames kept by the gate.
    pub const GATE_KEEP_RATIO: &str = "vclean_gate_keep_ratio";

    /// Total compressor runs.
    pub const COMPRESSOR_RUNS_TOTAL: &str = "vclean_compressor_runs_total";

    /// Lowest gain reached by the compressor in a run.
    pub const COMPRESSOR_MIN_GAIN: &str = "vclean_compressor_min_gain";

    /// Deepest gain reduction in a run, in dB.
    pub const COMPRESSOR_GAIN_REDUCTION_DB: &str = "vclean_compressor_gain_reduction_db";

    /// Stage wall time in seconds by stage.
    pub const STAGE_DURATION_SECONDS: &str = "vclean_stage_duration_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record a completed gate run.
pub fn record_gate(dropped_intervals: usize, keep_ratio: f64) {
    counter!(names::GATE_RUNS_TOTAL).increment(1);
    if dropped_intervals > 0 {
        counter!(names::GATE_INTERVALS_DROPPED_TOTAL).increment(dropped_intervals as u64);
    }
    histogram!(names::GATE_KEEP_RATIO).record(keep_ratio);
}

/// Record a completed compressor run.
///
/// The minimum gain is only known when gain traces were kept.
pub fn record_compressor(min_gain: Option<f32>) {
    counter!(names::COMPRESSOR_RUNS_TOTAL).increment(1);
    if let Some(min_gain) = min_gain {
        histogram!(names::COMPRESSOR_MIN_GAIN).record(min_gain as f64);
        histogram!(names::COMPRESSOR_GAIN_REDUCTION_DB).record(-gain_to_db(min_gain as f64));
    }
}

/// Record how long a pipeline stage took.
pub fn record_stage_duration(stage: &str, elapsed: Duration) {
    histogram!(
        names::STAGE_DURATION_SECONDS,
        "stage" => stage.to_string()
    )
    .record(elapsed.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
