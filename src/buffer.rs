/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use crate::error::{DspError, Result};

pub const SAMPLE_MAX: f64 = 32767.0;
pub const SAMPLE_MIN: f64 = -32768.0;

/// Quantize a real value to a 16-bit sample: round half up, then clamp to the i16 range.
/// NaN maps to 0.
pub fn quantize(x: f64) -> i16 {
    if x.is_nan() {
        return 0;
    }
    (x + 0.5).floor().clamp(SAMPLE_MIN, SAMPLE_MAX) as i16
}

/// Mono buffer of 16-bit samples at a fixed sample rate.
///
/// Buffers are values: every transformation in this crate builds a new buffer
/// of the same length and sample rate instead of mutating the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub const CHANNELS: u16 = 1;

    /// Creates a buffer. Fails if `sample_rate` is zero.
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(DspError::invalid("sample rate must be positive"));
        }
        Ok(SampleBuffer { samples, sample_rate })
    }

    /// Creates a buffer from real-valued samples, quantizing each one with [`quantize`].
    pub fn from_real(values: &[f64], sample_rate: u32) -> Result<Self> {
        SampleBuffer::new(values.iter().map(|&v| quantize(v)).collect(), sample_rate)
    }

    /// New buffer with the same sample rate. Used by the filters, whose output
    /// always matches the input length.
    pub(crate) fn with_samples(&self, samples: Vec<i16>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        SampleBuffer {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        Self::CHANNELS
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_quantize_rounds_half_up() {
        assert_eq!(quantize(22.5), 23);
        assert_eq!(quantize(22.4999), 22);
        assert_eq!(quantize(-22.5), -22);
        assert_eq!(quantize(-22.51), -23);
        assert_eq!(quantize(0.0), 0);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(1e9), i16::MAX);
        assert_eq!(quantize(-1e9), i16::MIN);
        assert_eq!(quantize(32767.4), i16::MAX);
        assert_eq!(quantize(f64::NAN), 0);
        assert_eq!(quantize(f64::INFINITY), i16::MAX);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let res = SampleBuffer::new(vec![1, 2, 3], 0);
        assert!(matches!(res, Err(DspError::InvalidParameter(_))));
    }

    #[test]
    fn test_from_real_and_duration() {
        let buf = SampleBuffer::from_real(&[0.4, 1.5, -70000.0, 40000.0], 4).unwrap();
        assert_eq!(buf.samples(), &[0, 2, i16::MIN, i16::MAX]);
        assert_eq!(buf.channels(), 1);
        assert!(approx_eq!(f64, buf.duration_secs(), 1.0, epsilon = 1e-12));
    }
}
