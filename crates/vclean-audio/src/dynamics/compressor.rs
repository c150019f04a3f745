//! Feed-forward dynamics compressor.
//!
//! Each channel runs its own envelope; channels are not linked. After the
//! gain pass the whole buffer is peak-normalized to the full scale of the
//! configured output format.

use rayon::prelude::*;
use tracing::debug;
use vclean_models::CompressorConfig;

use super::envelope::{process_channel, EnvelopeCoefficients};
use super::normalize::normalize_gained;
use crate::error::AudioResult;
use crate::units::gain_to_db;
use crate::waveform::Waveform;

/// Compressor output with the intermediate values used to produce it.
#[derive(Debug, Clone)]
pub struct CompressedAudio {
    /// Normalized output, scaled to the output format's full scale.
    pub waveform: Waveform,
    /// Per-channel gain sequence, one entry per sample.
    pub gain_traces: Vec<Vec<f32>>,
    /// Peak magnitude after gain and makeup, before normalization.
    pub pre_normalization_peak: f64,
    /// Factor applied by normalization; `None` for silent output.
    pub normalization_scale: Option<f64>,
}

impl CompressedAudio {
    /// Lowest gain any channel reached.
    pub fn min_gain(&self) -> f32 {
        self.gain_traces
            .iter()
            .flatten()
            .fold(1.0f32, |min, g| min.min(*g))
    }

    /// Deepest gain reduction across channels, in dB (0 when the gain
    /// never left unity).
    pub fn max_gain_reduction_db(&self) -> f64 {
        -gain_to_db(self.min_gain() as f64)
    }
}

/// Envelope compressor with peak normalization.
#[derive(Debug, Clone)]
pub struct DynamicsCompressor {
    config: CompressorConfig,
    parallel: bool,
}

impl DynamicsCompressor {
    /// Create a compressor, validating the config eagerly.
    pub fn new(config: CompressorConfig) -> AudioResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parallel: true,
        })
    }

    /// Run channels one after another on the calling thread.
    ///
    /// Output is bit-identical to the parallel path.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// The compressor's configuration.
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Compress and normalize `waveform`.
    pub fn compress(&self, waveform: &Waveform) -> AudioResult<Waveform> {
        self.run(waveform, false).map(|out| out.waveform)
    }

    /// Compress and normalize `waveform`, keeping the gain traces.
    pub fn compress_with_trace(&self, waveform: &Waveform) -> AudioResult<CompressedAudio> {
        self.run(waveform, true)
    }

    fn run(&self, waveform: &Waveform, keep_trace: bool) -> AudioResult<CompressedAudio> {
        waveform.ensure_not_empty()?;
        waveform.ensure_finite()?;

        let coeffs = EnvelopeCoefficients::new(waveform.sample_rate(), &self.config);

        let parallel = self.parallel && waveform.num_channels() > 1;
        let processed: Vec<(Vec<f64>, Option<Vec<f32>>)> = if parallel {
            waveform
                .channels()
                .par_iter()
                .map(|channel| process_channel(channel, &coeffs, keep_trace))
                .collect()
        } else {
            waveform
                .channels()
                .iter()
                .map(|channel| process_channel(channel, &coeffs, keep_trace))
                .collect()
        };

        let (gained, traces): (Vec<Vec<f64>>, Vec<Option<Vec<f32>>>) =
            processed.into_iter().unzip();
        let gain_traces: Vec<Vec<f32>> = traces.into_iter().flatten().collect();

        let full_scale = self.config.output_format.full_scale();
        let normalized = normalize_gained(gained, full_scale)?;
        let pre_normalization_peak = normalized.peak;
        let normalization_scale = normalized.scale;

        let result = CompressedAudio {
            waveform: Waveform::new(normalized.channels, waveform.sample_rate())?,
            gain_traces,
            pre_normalization_peak,
            normalization_scale,
        };

        crate::metrics::record_compressor(keep_trace.then(|| result.min_gain()));

        debug!(
            channels = waveform.num_channels(),
            frames = waveform.num_frames(),
            threshold_db = self.config.threshold_db,
            ratio = self.config.ratio,
            pre_normalization_peak,
            normalization_scale = ?normalization_scale,
            full_scale,
            "Dynamics compression applied"
        );

        Ok(result)
    }
}

/// Compress a waveform with `config`.
pub fn compress(waveform: &Waveform, config: &CompressorConfig) -> AudioResult<Waveform> {
    DynamicsCompressor::new(config.clone())?.compress(waveform)
}
