/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use crate::buffer::{quantize, SampleBuffer};
use crate::params::KalmanParams;

const INITIAL_ESTIMATE: f64 = 0.0;
const INITIAL_ERROR_COVARIANCE: f64 = 1.0;

/// Scalar Kalman filter with a random-walk state model.
///
/// The filter starts from `estimate = 0.0`, `error_covariance = 1.0`.
/// [`KalmanFilter::apply`] resets to that state before it reads the buffer,
/// so one value may be reused for unrelated buffers without leaking state
/// between them. [`KalmanFilter::step`] advances the running state by one
/// measurement and is what `apply` is built from.
#[derive(Clone, Debug)]
pub struct KalmanFilter {
    params: KalmanParams,
    estimate: f64,
    error_covariance: f64,
    gain: f64,
}

impl KalmanFilter {
    pub fn new(params: KalmanParams) -> Self {
        KalmanFilter {
            params,
            estimate: INITIAL_ESTIMATE,
            error_covariance: INITIAL_ERROR_COVARIANCE,
            gain: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.estimate = INITIAL_ESTIMATE;
        self.error_covariance = INITIAL_ERROR_COVARIANCE;
        self.gain = 0.0;
    }

    /// One predict/update cycle. Returns the new estimate.
    pub fn step(&mut self, measurement: f64) -> f64 {
        // predict
        self.error_covariance += self.params.process_variance();
        // update
        self.gain = self.error_covariance / (self.error_covariance + self.params.measurement_variance());
        self.estimate += self.gain * (measurement - self.estimate);
        self.error_covariance *= 1.0 - self.gain;
        self.estimate
    }

    /// Filters the whole buffer in order, starting from a fresh state.
    pub fn apply(&mut self, buffer: &SampleBuffer) -> SampleBuffer {
        self.reset();
        let out: Vec<i16> = buffer
            .samples()
            .iter()
            .map(|&s| quantize(self.step(s as f64)))
            .collect();
        log::debug!(
            "kalman: filtered {} samples (Q={}, R={}), final gain {:.6}",
            out.len(),
            self.params.process_variance(),
            self.params.measurement_variance(),
            self.gain
        );
        buffer.with_samples(out)
    }

    pub fn params(&self) -> KalmanParams {
        self.params
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn error_covariance(&self) -> f64 {
        self.error_covariance
    }

    /// Gain used by the most recent step (0 before the first step).
    pub fn gain(&self) -> f64 {
        self.gain
    }
}

/// Runs a fresh [`KalmanFilter`] over `buffer`.
pub fn kalman_filter(buffer: &SampleBuffer, params: KalmanParams) -> SampleBuffer {
    KalmanFilter::new(params).apply(buffer)
}
