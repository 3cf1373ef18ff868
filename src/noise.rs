/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::buffer::{quantize, SampleBuffer};
use crate::error::Result;
use crate::params::NoiseSpec;

/// Additive white Gaussian noise source.
///
/// `new` seeds from the OS; `with_seed` gives a reproducible noise track.
pub struct NoiseInjector {
    rng: StdRng,
}

impl NoiseInjector {
    pub fn new() -> Self {
        NoiseInjector {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        NoiseInjector {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `len` quantized noise samples: N(0, 1) scaled by `NoiseSpec::amplitude`.
    pub fn noise(&mut self, len: usize, spec: NoiseSpec) -> Vec<i16> {
        let amplitude = spec.amplitude();
        (0..len)
            .map(|_| {
                let z: f64 = StandardNormal.sample(&mut self.rng);
                quantize(z * amplitude)
            })
            .collect()
    }

    /// Overlays fresh noise on `buffer`, saturating at the i16 limits.
    pub fn apply(&mut self, buffer: &SampleBuffer, spec: NoiseSpec) -> Result<SampleBuffer> {
        if spec.intensity() == 0 || buffer.is_empty() {
            log::debug!("noise: intensity {} on {} samples, nothing to add", spec.intensity(), buffer.len());
            return Ok(buffer.clone());
        }
        let noise = self.noise(buffer.len(), spec);
        let mixed = overlay(buffer.samples(), &noise);
        log::debug!("noise: added {}% white noise to {} samples", spec.intensity(), buffer.len());
        Ok(buffer.with_samples(mixed))
    }
}

impl Default for NoiseInjector {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample-wise saturating sum of two tracks of equal length.
pub fn overlay(signal: &[i16], noise: &[i16]) -> Vec<i16> {
    signal
        .iter()
        .zip(noise.iter())
        .map(|(&s, &n)| s.saturating_add(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleBuffer {
        let samples = (0..len).map(|i| ((i as i32 * 37) % 2000 - 1000) as i16).collect();
        SampleBuffer::new(samples, 8000).unwrap()
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        let buf = ramp(500);
        let out = NoiseInjector::new().apply(&buf, NoiseSpec::new(0).unwrap()).unwrap();
        assert_eq!(out.samples(), buf.samples());
        assert_eq!(out.sample_rate(), buf.sample_rate());
    }

    #[test]
    fn test_zero_intensity_noise_track_is_silent() {
        let noise = NoiseInjector::with_seed(3).noise(100, NoiseSpec::new(0).unwrap());
        assert!(noise.iter().all(|&n| n == 0));
    }

    #[test]
    fn test_preserves_length_and_rate() {
        let buf = ramp(1234);
        let out = NoiseInjector::new().apply(&buf, NoiseSpec::new(30).unwrap()).unwrap();
        assert_eq!(out.len(), buf.len());
        assert_eq!(out.sample_rate(), 8000);
        assert_ne!(out.samples(), buf.samples());
    }

    #[test]
    fn test_empty_buffer() {
        let buf = SampleBuffer::new(vec![], 44100).unwrap();
        let out = NoiseInjector::new().apply(&buf, NoiseSpec::new(80).unwrap()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_seeded_injection_is_reproducible() {
        let buf = ramp(800);
        let spec = NoiseSpec::new(10).unwrap();
        let a = NoiseInjector::with_seed(42).apply(&buf, spec).unwrap();
        let b = NoiseInjector::with_seed(42).apply(&buf, spec).unwrap();
        let c = NoiseInjector::with_seed(43).apply(&buf, spec).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_overlay_saturates() {
        let spec = NoiseSpec::new(100).unwrap();
        let buf = SampleBuffer::new(vec![i16::MAX; 2000], 8000).unwrap();
        let noise = NoiseInjector::with_seed(7).noise(buf.len(), spec);
        let out = NoiseInjector::with_seed(7).apply(&buf, spec).unwrap();
        for ((&o, &n), &s) in out.samples().iter().zip(&noise).zip(buf.samples()) {
            assert_eq!(o, s.saturating_add(n));
        }
        // positive noise never wraps around to negative values
        assert!(out
            .samples()
            .iter()
            .zip(&noise)
            .filter(|&(_, &n)| n > 0)
            .all(|(&o, _)| o == i16::MAX));
    }

    #[test]
    fn test_noise_scale_matches_intensity() {
        // 25% keeps the clamp four standard deviations away
        let spec = NoiseSpec::new(25).unwrap();
        let noise = NoiseInjector::with_seed(1).noise(20_000, spec);
        let n = noise.len() as f64;
        let mean = noise.iter().map(|&x| x as f64).sum::<f64>() / n;
        let var = noise.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / n;
        let expected = spec.amplitude();
        assert!(mean.abs() < 0.05 * expected, "mean={}", mean);
        assert!((var.sqrt() - expected).abs() < 0.05 * expected, "std={}, expected={}", var.sqrt(), expected);
    }
}
