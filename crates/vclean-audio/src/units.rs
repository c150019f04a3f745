//! Unit conversion helpers.

/// Convert decibels to a linear amplitude factor: `10^(db / 20)`.
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Convert a linear amplitude factor to decibels.
///
/// Returns negative infinity for a zero gain.
#[inline]
pub fn gain_to_db(gain: f64) -> f64 {
    20.0 * gain.log10()
}

/// One-pole smoothing coefficient for a time constant.
///
/// `exp(-1 / (sample_rate * seconds))`; values closer to 1 respond more
/// slowly.
#[inline]
pub fn time_constant_coeff(sample_rate: u32, seconds: f64) -> f64 {
    (-1.0 / seconds_to_samples(sample_rate, seconds)).exp()
}

/// Convert a time in seconds to a (fractional) sample count.
#[inline]
pub fn seconds_to_samples(sample_rate: u32, seconds: f64) -> f64 {
    seconds * sample_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_gain() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-12);
        assert!((db_to_gain(-10.0) - 0.316_227_766).abs() < 1e-9);
        assert!((db_to_gain(6.0) - 1.995_262_315).abs() < 1e-9);
    }

    #[test]
    fn test_gain_to_db() {
        assert!((gain_to_db(0.1) + 20.0).abs() < 1e-9);
        assert!(gain_to_db(0.0).is_infinite());
    }

    #[test]
    fn test_time_constant_coeff() {
        // One time constant at 1 kHz with 10 ms is 10 samples.
        let coeff = time_constant_coeff(1000, 0.01);
        assert!((coeff - (-0.1f64).exp()).abs() < 1e-12);

        let slow = time_constant_coeff(48000, 0.5);
        let fast = time_constant_coeff(48000, 0.001);
        assert!(slow > fast);
        assert!(slow < 1.0 && fast > 0.0);
    }

    #[test]
    fn test_seconds_to_samples() {
        assert_eq!(seconds_to_samples(44100, 0.5), 22050.0);
    }
}
