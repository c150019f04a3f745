//! Per-channel gain envelope.
//!
//! Level detection is feed-forward: the magnitude of each *input* sample
//! drives the target gain, and the gain moves towards that target with
//! the attack coefficient when falling and the release coefficient when
//! rising or holding.
//!
//! The soft knee blends the detected level in the linear amplitude
//! domain:
//!
//! ```text
//! if knee_db > 0 and |level - threshold| <= knee_db / 2:
//!     level = threshold + (level - threshold) / (1 + (level - threshold) / knee_db)
//! ```
//!
//! This is not the textbook dB-domain quadratic knee and must stay as-is;
//! output parity depends on it.

use vclean_models::CompressorConfig;

use crate::units::{db_to_gain, time_constant_coeff};

/// Coefficients derived from a config and a sample rate, shared by every
/// channel of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeCoefficients {
    /// Threshold as linear amplitude.
    pub threshold_lin: f64,
    /// Gain applied above the threshold (`1 / ratio`).
    pub reduction: f64,
    /// Knee width as configured.
    pub knee_db: f64,
    /// Smoothing coefficient while gain decreases.
    pub attack_coeff: f64,
    /// Smoothing coefficient while gain increases or holds.
    pub release_coeff: f64,
    /// Makeup gain as linear amplitude.
    pub makeup_lin: f64,
}

impl EnvelopeCoefficients {
    /// Precompute coefficients. `config` must already be validated.
    pub fn new(sample_rate: u32, config: &CompressorConfig) -> Self {
        Self {
            threshold_lin: db_to_gain(config.threshold_db),
            reduction: 1.0 / config.ratio,
            knee_db: config.knee_db,
            attack_coeff: time_constant_coeff(sample_rate, config.attack_seconds),
            release_coeff: time_constant_coeff(sample_rate, config.release_seconds),
            makeup_lin: db_to_gain(config.makeup_gain_db),
        }
    }

    /// Detected level after the soft knee.
    #[inline]
    pub fn knee_level(&self, level: f64) -> f64 {
        if self.knee_db > 0.0 {
            let over = level - self.threshold_lin;
            if over.abs() <= self.knee_db / 2.0 {
                return self.threshold_lin + over / (1.0 + over / self.knee_db);
            }
        }
        level
    }

    /// Target gain for one input sample.
    #[inline]
    pub fn target_gain(&self, sample: f32) -> f64 {
        let level = self.knee_level(sample.abs() as f64);
        if level > self.threshold_lin {
            self.reduction
        } else {
            1.0
        }
    }

    /// One step of the attack/release recurrence.
    #[inline]
    pub fn step(&self, previous: f64, target: f64) -> f64 {
        let coeff = if target < previous {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        coeff * previous + (1.0 - coeff) * target
    }
}

/// Compute the gain for every sample of one channel.
///
/// The envelope starts at unity for the first sample and is discarded
/// after the pass; nothing carries over between calls.
pub fn gain_trace(samples: &[f32], coeffs: &EnvelopeCoefficients) -> Vec<f32> {
    let mut trace = Vec::with_capacity(samples.len());
    for_each_gain(samples, coeffs, |_, gain| trace.push(gain as f32));
    trace
}

/// Compress one channel, returning the gained samples and optionally the
/// gain trace.
///
/// Gained samples stay in `f64`; large makeup gains can push them past
/// `f32::MAX` and they are only narrowed after normalization.
pub(crate) fn process_channel(
    samples: &[f32],
    coeffs: &EnvelopeCoefficients,
    keep_trace: bool,
) -> (Vec<f64>, Option<Vec<f32>>) {
    let mut output = Vec::with_capacity(samples.len());
    let mut trace = keep_trace.then(|| Vec::with_capacity(samples.len()));

    for_each_gain(samples, coeffs, |i, gain| {
        output.push(samples[i] as f64 * gain * coeffs.makeup_lin);
        if let Some(trace) = trace.as_mut() {
            trace.push(gain as f32);
        }
    });

    (output, trace)
}

fn for_each_gain(samples: &[f32], coeffs: &EnvelopeCoefficients, mut f: impl FnMut(usize, f64)) {
    let mut gain = 1.0f64;
    for (i, &sample) in samples.iter().enumerate() {
        if i > 0 {
            gain = coeffs.step(gain, coeffs.target_gain(sample));
        }
        f(i, gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hard_knee() -> EnvelopeCoefficients {
        EnvelopeCoefficients::new(1000, &CompressorConfig::speech().with_knee_db(0.0))
    }

    #[test]
    fn test_coefficients() {
        let coeffs = EnvelopeCoefficients::new(1000, &CompressorConfig::speech());
        assert!((coeffs.threshold_lin - 0.316_227_766).abs() < 1e-9);
        assert!((coeffs.reduction - 0.25).abs() < 1e-12);
        assert!((coeffs.attack_coeff - (-1.0f64 / 20.0).exp()).abs() < 1e-12);
        assert!((coeffs.release_coeff - (-1.0f64 / 100.0).exp()).abs() < 1e-12);
        assert!((coeffs.makeup_lin - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_gain_is_unity() {
        let trace = gain_trace(&[1.0, 1.0, 1.0], &hard_knee());
        assert_eq!(trace[0], 1.0);
        assert!(trace[1] < 1.0);
    }

    #[test]
    fn test_target_gain_hard_knee() {
        let coeffs = hard_knee();
        assert_eq!(coeffs.target_gain(0.9), 0.25);
        assert_eq!(coeffs.target_gain(-0.9), 0.25);
        assert_eq!(coeffs.target_gain(0.1), 1.0);
    }

    #[test]
    fn test_knee_blend_is_linear_domain() {
        let coeffs = EnvelopeCoefficients::new(1000, &CompressorConfig::speech());
        let t = coeffs.threshold_lin;

        let level = 0.9;
        let over = level - t;
        let expected = t + over / (1.0 + over / 5.0);
        assert!((coeffs.knee_level(level) - expected).abs() < 1e-12);
        assert!(coeffs.knee_level(level) < level);

        // Outside the knee region the level passes through untouched.
        assert_eq!(coeffs.knee_level(t + 3.0), t + 3.0);
    }

    #[test]
    fn test_attack_and_release_asymmetry() {
        let coeffs = hard_knee();

        let falling = coeffs.step(1.0, 0.25);
        assert!((falling - (coeffs.attack_coeff + (1.0 - coeffs.attack_coeff) * 0.25)).abs() < 1e-12);

        let rising = coeffs.step(0.25, 1.0);
        assert!((rising - (coeffs.release_coeff * 0.25 + (1.0 - coeffs.release_coeff))).abs() < 1e-12);

        // Attack (20 ms) moves further per sample than release (100 ms).
        assert!(1.0 - falling > rising - 0.25);
    }

    #[test]
    fn test_process_channel_applies_gain_and_makeup() {
        let config = CompressorConfig::speech().with_knee_db(0.0).with_makeup_gain_db(6.0);
        let coeffs = EnvelopeCoefficients::new(1000, &config);
        let samples = [0.5f32, 0.5, -0.5];
        let (output, trace) = process_channel(&samples, &coeffs, true);
        let trace = trace.unwrap();

        for i in 0..samples.len() {
            let expected = samples[i] as f64 * trace[i] as f64 * coeffs.makeup_lin;
            assert!((output[i] - expected).abs() < 1e-6);
        }
        assert_eq!(gain_trace(&samples, &coeffs), trace);
    }

    #[test]
    fn test_process_channel_keeps_headroom_beyond_f32() {
        let config = CompressorConfig::speech().with_knee_db(0.0).with_makeup_gain_db(12.0);
        let coeffs = EnvelopeCoefficients::new(1000, &config);
        let (output, _) = process_channel(&[3.0e38, 0.5], &coeffs, false);

        assert!(output[0].is_finite());
        assert!(output[0] > f32::MAX as f64);
    }
}
