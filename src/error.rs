/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use thiserror::Error;

/// Errors produced by the denoising engine and its WAV collaborators.
///
/// Only `InvalidParameter` is ever raised by the engine itself; `Decode` and
/// `Encode` come from reading and writing files in [`crate::wav`], `Export`
/// from [`crate::plot`].
#[derive(Debug, Error)]
pub enum DspError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("failed to encode '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("failed to export waveform to '{path}': {source}")]
    Export {
        path: String,
        #[source]
        source: csv::Error,
    },
}

impl DspError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DspError::InvalidParameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DspError>;
