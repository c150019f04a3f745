//! In-memory speech cleanup: gate, optional external stage, compress.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Waveform +   │───►│ SpeechGate   │───►│ Stage        │───►│ Compressor   │
//! │ VAD intervals│    │              │    │ (optional)   │    │ + normalize  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Decoding, filtering, encoding and muxing belong to the caller. The
//! optional stage is the seam where an externally implemented filter
//! (for example a high-pass) is plugged in.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;
use vclean_models::{CompressorConfig, GateConfig, SpeechInterval};

use crate::dynamics::DynamicsCompressor;
use crate::error::AudioResult;
use crate::speech_gate::{GateStats, SpeechGate};
use crate::waveform::Waveform;

/// A caller-provided processing step run between gate and compressor.
pub trait WaveformStage: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &str;

    /// Transform the gated waveform.
    fn process(&self, waveform: Waveform) -> AudioResult<Waveform>;
}

/// Wall time spent in one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    /// Stage name as reported by the stage.
    pub stage: String,
    /// Wall time from stage entry to exit.
    pub elapsed: Duration,
}

/// Output of a cleanup run.
#[derive(Debug, Clone)]
pub struct CleanupReport {
    /// Final waveform, normalized to the compressor's output format.
    pub waveform: Waveform,
    /// What the gate kept.
    pub gate_stats: GateStats,
    /// Lowest compressor gain across channels.
    pub min_gain: f32,
    /// Normalization factor; `None` when the gated audio was silent.
    pub normalization_scale: Option<f64>,
    /// Per-stage timings in execution order.
    pub timings: Vec<StageTiming>,
}

/// Gate → stage → compressor, with both configs validated up front.
pub struct SpeechCleanup {
    gate: SpeechGate,
    compressor: DynamicsCompressor,
    stage: Option<Box<dyn WaveformStage>>,
}

impl SpeechCleanup {
    /// Create a pipeline. Fails if the compressor config is invalid.
    pub fn new(gate_config: GateConfig, compressor_config: CompressorConfig) -> AudioResult<Self> {
        Ok(Self {
            gate: SpeechGate::new(gate_config),
            compressor: DynamicsCompressor::new(compressor_config)?,
            stage: None,
        })
    }

    /// Create a pipeline from `VCLEAN_*` environment variables.
    pub fn from_env() -> AudioResult<Self> {
        Self::new(GateConfig::from_env(), CompressorConfig::from_env())
    }

    /// Insert a stage between the gate and the compressor.
    pub fn with_stage(mut self, stage: Box<dyn WaveformStage>) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Run every stage on `waveform`.
    ///
    /// Nothing is returned on error; the input is never modified.
    pub fn run(&self, waveform: &Waveform, intervals: &[SpeechInterval]) -> AudioResult<CleanupReport> {
        let mut timings = Vec::with_capacity(3);

        let start = Instant::now();
        let gated = self.gate.gate(waveform, intervals)?;
        timings.push(timing("gate", start.elapsed()));

        let mut audio = gated.waveform;
        if let Some(stage) = &self.stage {
            let start = Instant::now();
            audio = stage.process(audio)?;
            timings.push(timing(stage.name(), start.elapsed()));
        }

        let start = Instant::now();
        let compressed = self.compressor.compress_with_trace(&audio)?;
        timings.push(timing("compress", start.elapsed()));

        for t in &timings {
            crate::metrics::record_stage_duration(&t.stage, t.elapsed);
        }

        let min_gain = compressed.min_gain();

        info!(
            frames = waveform.num_frames(),
            channels = waveform.num_channels(),
            keep_ratio = format!("{:.1}%", gated.stats.keep_ratio * 100.0),
            dropped_intervals = gated.stats.dropped_intervals,
            min_gain,
            max_gain_reduction_db = compressed.max_gain_reduction_db(),
            "Speech cleanup complete"
        );

        Ok(CleanupReport {
            waveform: compressed.waveform,
            gate_stats: gated.stats,
            min_gain,
            normalization_scale: compressed.normalization_scale,
            timings,
        })
    }
}

fn timing(stage: &str, elapsed: Duration) -> StageTiming {
    StageTiming {
        stage: stage.to_string(),
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;

    struct Halve;

    impl WaveformStage for Halve {
        fn name(&self) -> &str {
            "halve"
        }

        fn process(&self, waveform: Waveform) -> AudioResult<Waveform> {
            let rate = waveform.sample_rate();
            let channels = waveform
                .into_channels()
                .into_iter()
                .map(|c| c.into_iter().map(|s| s * 0.5).collect())
                .collect();
            Waveform::new(channels, rate)
        }
    }

    struct Failing;

    impl WaveformStage for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn process(&self, _waveform: Waveform) -> AudioResult<Waveform> {
            Err(AudioError::stage("failing", "boom"))
        }
    }

    fn tone() -> Waveform {
        let samples = (0..1000).map(|i| 0.8 * ((i as f32) * 0.1).sin()).collect();
        Waveform::mono(samples, 1000).unwrap()
    }

    #[test]
    fn test_run_without_stage() {
        let cleanup = SpeechCleanup::new(GateConfig::default(), CompressorConfig::speech()).unwrap();
        let report = cleanup
            .run(&tone(), &[SpeechInterval::unchecked(0.25, 0.75)])
            .unwrap();

        assert_eq!(report.waveform.num_frames(), 1000);
        assert_eq!(report.waveform.peak(), 32767.0);
        assert_eq!(report.gate_stats.kept_frames, 500);
        assert!(report.min_gain < 1.0);
        let stages: Vec<_> = report.timings.iter().map(|t| t.stage.as_str()).collect();
        assert_eq!(stages, vec!["gate", "compress"]);

        let out = report.waveform.channel(0).unwrap();
        assert!(out[..250].iter().all(|s| *s == 0.0));
        assert!(out[750..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_run_with_stage() {
        let cleanup = SpeechCleanup::new(GateConfig::default(), CompressorConfig::speech())
            .unwrap()
            .with_stage(Box::new(Halve));
        let report = cleanup
            .run(&tone(), &[SpeechInterval::unchecked(0.0, 1.0)])
            .unwrap();

        let stages: Vec<_> = report.timings.iter().map(|t| t.stage.as_str()).collect();
        assert_eq!(stages, vec!["gate", "halve", "compress"]);
    }

    #[test]
    fn test_stage_failure_propagates() {
        let cleanup = SpeechCleanup::new(GateConfig::default(), CompressorConfig::speech())
            .unwrap()
            .with_stage(Box::new(Failing));
        let err = cleanup
            .run(&tone(), &[SpeechInterval::unchecked(0.0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, AudioError::Stage { .. }));
    }

    #[test]
    fn test_invalid_compressor_config_rejected_up_front() {
        let result = SpeechCleanup::new(
            GateConfig::default(),
            CompressorConfig::speech().with_release_seconds(0.0),
        );
        assert!(matches!(result, Err(AudioError::Config(_))));
    }

    #[test]
    fn test_stage_timing_serializes_name_and_elapsed() {
        let json = serde_json::to_value(timing("gate", Duration::from_millis(1500))).unwrap();

        assert_eq!(json["stage"], "gate");
        assert_eq!(json["elapsed"]["secs"], 1);
        assert_eq!(json["elapsed"]["nanos"], 500_000_000);
    }

    #[test]
    fn test_silent_gate_output_stays_silent() {
        let cleanup = SpeechCleanup::new(GateConfig::default(), CompressorConfig::speech()).unwrap();
        let report = cleanup.run(&tone(), &[]).unwrap();

        assert_eq!(report.waveform.peak(), 0.0);
        assert_eq!(report.normalization_scale, None);
        assert_eq!(report.min_gain, 1.0);
    }
}
