//! Decoded multi-channel audio held in memory.
//!
//! Samples are stored planar (one `Vec<f32>` per channel) so per-channel
//! scans run over contiguous memory. Float samples use a nominal full
//! scale of 1.0; buffers that have been normalized for 16-bit output hold
//! values up to 32767 and are converted with [`Waveform::to_i16_interleaved`].

use crate::error::{AudioError, AudioResult};

/// Divisor mapping 16-bit PCM into `[-1.0, 1.0)`.
const I16_SCALE: f32 = 32768.0;

/// An immutable-shape audio buffer: fixed sample rate and channel count,
/// every channel the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from planar channel data.
    ///
    /// Rejects zero channels, a zero sample rate and channels of differing
    /// length. A waveform with zero frames is allowed to exist but is
    /// rejected by the processing stages.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }

        let expected = channels.first().ok_or(AudioError::NoChannels)?.len();
        if let Some((channel, data)) = channels
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != expected)
        {
            return Err(AudioError::ChannelLengthMismatch {
                channel,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a mono waveform.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> AudioResult<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Create a waveform from interleaved float samples.
    pub fn from_interleaved(
        samples: &[f32],
        num_channels: usize,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        let planar = deinterleave(samples, num_channels, |s| s)?;
        Self::new(planar, sample_rate)
    }

    /// Create a waveform from interleaved 16-bit PCM.
    ///
    /// Samples are divided by 32768, so `i16::MIN` maps to exactly -1.0.
    pub fn from_i16_interleaved(
        samples: &[i16],
        num_channels: usize,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        let planar = deinterleave(samples, num_channels, |s| s as f32 / I16_SCALE)?;
        Self::new(planar, sample_rate)
    }

    /// Create an all-zero waveform.
    pub fn silent(num_channels: usize, num_frames: usize, sample_rate: u32) -> AudioResult<Self> {
        Self::new(vec![vec![0.0; num_frames]; num_channels], sample_rate)
    }

    /// Create an all-zero waveform with the same shape as `other`.
    pub fn silent_like(other: &Waveform) -> Self {
        Self {
            channels: vec![vec![0.0; other.num_frames()]; other.num_channels()],
            sample_rate: other.sample_rate,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (at least 1).
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// All channels, planar.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Consume the waveform and return its planar channels.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Largest absolute sample value across every channel.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|c| c.iter())
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    /// Convert a time in seconds to a frame index.
    ///
    /// Uses `round(secs * sample_rate)` clamped to `[0, num_frames]`; NaN
    /// maps to 0.
    pub fn seconds_to_frame(&self, secs: f64) -> usize {
        let frames = self.num_frames();
        let index = (secs * self.sample_rate as f64).round();

        if index.is_nan() || index <= 0.0 {
            0
        } else if index >= frames as f64 {
            frames
        } else {
            index as usize
        }
    }

    /// Reject waveforms the processing stages cannot work on.
    pub fn ensure_not_empty(&self) -> AudioResult<()> {
        if self.is_empty() {
            return Err(AudioError::NoSamples);
        }
        Ok(())
    }

    /// Reject NaN or infinite samples.
    pub fn ensure_finite(&self) -> AudioResult<()> {
        for (channel, data) in self.channels.iter().enumerate() {
            if let Some(frame) = data.iter().position(|s| !s.is_finite()) {
                return Err(AudioError::NonFiniteSample { channel, frame });
            }
        }
        Ok(())
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Interleave channels into a single float buffer.
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.interleave(|s| s)
    }

    /// Interleave into 16-bit PCM.
    ///
    /// Each value is rounded and clamped into `[-32768, 32767]`; values
    /// are never wrapped. Intended for buffers already scaled to the
    /// 16-bit full scale, such as compressor output for
    /// [`vclean_models::SampleFormat::S16`].
    pub fn to_i16_interleaved(&self) -> Vec<i16> {
        self.interleave(|s| s.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
    }

    fn interleave<T>(&self, convert: impl Fn(f32) -> T) -> Vec<T> {
        let frames = self.num_frames();
        let mut out = Vec::with_capacity(frames * self.num_channels());
        for frame in 0..frames {
            for channel in &self.channels {
                out.push(convert(channel[frame]));
            }
        }
        out
    }
}

fn deinterleave<T: Copy>(
    samples: &[T],
    num_channels: usize,
    convert: impl Fn(T) -> f32,
) -> AudioResult<Vec<Vec<f32>>> {
    if num_channels == 0 {
        return Err(AudioError::NoChannels);
    }
    if samples.len() % num_channels != 0 {
        return Err(AudioError::InterleavedLength {
            len: samples.len(),
            channels: num_channels,
        });
    }

    let frames = samples.len() / num_channels;
    let mut planar = vec![Vec::with_capacity(frames); num_channels];
    for frame in samples.chunks_exact(num_channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(convert(sample));
        }
    }
    Ok(planar)
}
