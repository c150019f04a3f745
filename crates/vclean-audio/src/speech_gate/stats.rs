use serde::Serialize;

use super::timeline::SpeechTimeline;

/// Statistics about a gate run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateStats {
    /// Frames copied from the input.
    pub kept_frames: usize,
    /// Frames replaced by silence.
    pub silenced_frames: usize,
    /// Intervals that survived clamping.
    pub retained_intervals: usize,
    /// Intervals dropped because they were empty after clamping.
    pub dropped_intervals: usize,
    /// Ratio of kept frames (0.0 to 1.0).
    pub keep_ratio: f64,
}

/// Calculate statistics for a timeline.
pub fn compute_gate_stats(timeline: &SpeechTimeline) -> GateStats {
    let total = timeline.num_frames();
    let kept_frames = timeline.covered_frames().min(total);

    let keep_ratio = if total > 0 {
        kept_frames as f64 / total as f64
    } else {
        0.0
    };

    GateStats {
        kept_frames,
        silenced_frames: total - kept_frames,
        retained_intervals: timeline.retained_intervals(),
        dropped_intervals: timeline.dropped_intervals(),
        keep_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::Waveform;
    use vclean_models::{GateConfig, SpeechInterval};

    #[test]
    fn test_gate_stats() {
        let w = Waveform::silent(2, 1000, 1000).unwrap();
        let intervals = [
            SpeechInterval::unchecked(0.0, 0.25),
            SpeechInterval::unchecked(0.5, 0.75),
            SpeechInterval::unchecked(4.0, 5.0),
        ];
        let timeline = SpeechTimeline::build(&intervals, &w, &GateConfig::default());
        let stats = compute_gate_stats(&timeline);

        assert_eq!(stats.kept_frames, 500);
        assert_eq!(stats.silenced_frames, 500);
        assert_eq!(stats.retained_intervals, 2);
        assert_eq!(stats.dropped_intervals, 1);
        assert!((stats.keep_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gate_stats_no_intervals() {
        let w = Waveform::silent(1, 100, 1000).unwrap();
        let timeline = SpeechTimeline::build(&[], &w, &GateConfig::default());
        let stats = compute_gate_stats(&timeline);

        assert_eq!(stats.kept_frames, 0);
        assert_eq!(stats.silenced_frames, 100);
        assert_eq!(stats.keep_ratio, 0.0);
    }
}
