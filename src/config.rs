/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
//! Run configuration read from TOML.
//!
//! ```toml
//! filterKind = "Kalman"
//! processVariance = 0.01
//! measurementVariance = 0.05
//! noiseIntensity = 10
//! seed = 42            # optional, makes the noise reproducible
//! ```
//!
//! Keys the engine does not know are ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::DspError;
use crate::params::{KalmanParams, NoiseSpec, WindowParams};
use crate::pipeline::{Filter, FilterKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] DspError),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenoiseConfig {
    pub filter_kind: FilterKind,
    pub process_variance: Option<f64>,
    pub measurement_variance: Option<f64>,
    pub window_size: Option<usize>,
    /// Kept as a TOML integer so out-of-range values reach [`NoiseSpec::new`].
    #[serde(default)]
    pub noise_intensity: i64,
    pub seed: Option<u64>,
}

impl DenoiseConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the selected filter. Fields that belong to other filter kinds are ignored;
    /// a missing field for the selected kind is an invalid parameter.
    pub fn filter(&self) -> Result<Filter, DspError> {
        match self.filter_kind {
            FilterKind::Kalman => {
                let q = require(self.process_variance, "processVariance")?;
                let r = require(self.measurement_variance, "measurementVariance")?;
                Ok(Filter::Kalman(KalmanParams::new(q, r)?))
            }
            FilterKind::MovingAverage => {
                let w = require(self.window_size, "windowSize")?;
                Ok(Filter::MovingAverage(WindowParams::new(w)?))
            }
            FilterKind::Median => {
                let w = require(self.window_size, "windowSize")?;
                Ok(Filter::Median(WindowParams::new(w)?))
            }
        }
    }

    pub fn noise(&self) -> Result<NoiseSpec, DspError> {
        let intensity = u8::try_from(self.noise_intensity).map_err(|_| {
            DspError::invalid(format!(
                "noise intensity must be in 0..=100, got {}",
                self.noise_intensity
            ))
        })?;
        NoiseSpec::new(intensity)
    }
}

fn require<T>(value: Option<T>, key: &str) -> Result<T, DspError> {
    value.ok_or_else(|| DspError::invalid(format!("missing '{}' for the selected filter", key)))
}
