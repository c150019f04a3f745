//! Global peak normalization.

use crate::error::{AudioError, AudioResult};
use crate::waveform::Waveform;

/// Scale the whole buffer so its largest magnitude equals `full_scale`.
///
/// The peak is taken across all channels together, so inter-channel
/// balance is preserved. Each sample is computed as
/// `(sample / peak) * full_scale` and clamped to `±full_scale`, so the
/// peak sample lands exactly on full scale.
///
/// Returns the applied scale factor, or `None` for a silent buffer or one
/// holding non-finite samples, which is left untouched.
pub fn normalize_peak(waveform: &mut Waveform, full_scale: f32) -> Option<f64> {
    let peak = waveform.peak();
    if peak <= 0.0 || !peak.is_finite() {
        return None;
    }

    let peak = peak as f64;
    for channel in waveform.channels_mut() {
        for sample in channel.iter_mut() {
            *sample = scale_sample(*sample as f64, peak, full_scale);
        }
    }

    Some(full_scale as f64 / peak)
}

/// Compressor output after normalization.
#[derive(Debug)]
pub(crate) struct NormalizedChannels {
    pub channels: Vec<Vec<f32>>,
    /// Peak of the gained samples before scaling.
    pub peak: f64,
    pub scale: Option<f64>,
}

/// Peak-normalize gained samples held in `f64`, narrowing to `f32` only
/// after clamping to `±full_scale`.
///
/// Fails with [`AudioError::GainOverflow`] if the gain stage produced a
/// non-finite sample.
pub(crate) fn normalize_gained(
    channels: Vec<Vec<f64>>,
    full_scale: f32,
) -> AudioResult<NormalizedChannels> {
    let mut peak = 0.0f64;
    for (channel, samples) in channels.iter().enumerate() {
        for (frame, sample) in samples.iter().enumerate() {
            if !sample.is_finite() {
                return Err(AudioError::GainOverflow { channel, frame });
            }
            peak = peak.max(sample.abs());
        }
    }

    let scale = (peak > 0.0).then(|| full_scale as f64 / peak);
    let channels = channels
        .into_iter()
        .map(|samples| {
            samples
                .into_iter()
                .map(|s| {
                    if peak > 0.0 {
                        scale_sample(s, peak, full_scale)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    Ok(NormalizedChannels {
        channels,
        peak,
        scale,
    })
}

#[inline]
fn scale_sample(sample: f64, peak: f64, full_scale: f32) -> f32 {
    let full_scale = full_scale as f64;
    ((sample / peak) * full_scale).clamp(-full_scale, full_scale) as f32
}
