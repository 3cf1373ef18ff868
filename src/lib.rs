/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
pub mod buffer;
pub mod config;
pub mod error;
pub mod kalman;
pub mod median;
pub mod moving_average;
pub mod noise;
pub mod params;
pub mod pipeline;
pub mod plot;
pub mod utils;
pub mod wav;

pub use buffer::SampleBuffer;
pub use error::{DspError, Result};
pub use noise::NoiseInjector;
pub use params::{KalmanParams, NoiseSpec, WindowParams};
pub use pipeline::{apply, Filter, FilterKind, FilterParams, PipelineContext};

#[cfg(test)]
const _EPSILON: f64 = 1e-12;
