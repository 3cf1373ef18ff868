/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use crate::error::{DspError, Result};

/// Noise intensity in percent of full scale, 0..=100. Zero leaves the signal untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSpec {
    intensity: u8,
}

impl NoiseSpec {
    pub const MAX_INTENSITY: u8 = 100;

    pub fn new(intensity: u8) -> Result<Self> {
        if intensity > Self::MAX_INTENSITY {
            return Err(DspError::invalid(format!(
                "noise intensity must be in 0..=100, got {}",
                intensity
            )));
        }
        Ok(NoiseSpec { intensity })
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Standard deviation of the injected noise in sample units.
    pub fn amplitude(&self) -> f64 {
        self.intensity as f64 / 100.0 * crate::buffer::SAMPLE_MAX
    }
}

/// Kalman filter variances: `process_variance` (Q) and `measurement_variance` (R).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KalmanParams {
    process_variance: f64,
    measurement_variance: f64,
}

impl KalmanParams {
    /// Both variances must be finite and strictly positive.
    pub fn new(process_variance: f64, measurement_variance: f64) -> Result<Self> {
        if !(process_variance.is_finite() && process_variance > 0.0) {
            return Err(DspError::invalid(format!(
                "process variance must be positive, got {}",
                process_variance
            )));
        }
        if !(measurement_variance.is_finite() && measurement_variance > 0.0) {
            return Err(DspError::invalid(format!(
                "measurement variance must be positive, got {}",
                measurement_variance
            )));
        }
        Ok(KalmanParams {
            process_variance,
            measurement_variance,
        })
    }

    pub fn process_variance(&self) -> f64 {
        self.process_variance
    }

    pub fn measurement_variance(&self) -> f64 {
        self.measurement_variance
    }

    /// Fixed point of the gain recursion.
    ///
    /// With prior covariance `p = P + Q` the recursion settles where
    /// `p^2 - Q p - Q R = 0`, and the gain there is `p / (p + R)`.
    pub fn steady_state_gain(&self) -> f64 {
        let (q, r) = (self.process_variance, self.measurement_variance);
        let prior = (q + (q * q + 4.0 * q * r).sqrt()) / 2.0;
        prior / (prior + r)
    }
}

/// Window length shared by the moving-average and median filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowParams {
    window_size: usize,
}

impl WindowParams {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size < 1 {
            return Err(DspError::invalid("window size must be at least 1"));
        }
        Ok(WindowParams { window_size })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}
