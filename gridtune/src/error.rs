//! Error types for grid correction.

use std::path::PathBuf;

use thiserror::Error;

/// Error reported by a [`SurrogatePredictor`](crate::SurrogatePredictor) implementation.
pub type PredictorError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], for callers that map failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    DimensionMismatch,
    SpatialIndexBuild,
    EmptyRange,
    Predictor,
    Config,
}

/// Errors that can occur while building, sampling or correcting a grid.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required field '{field}' in {source_name}")]
    MissingField {
        field: String,
        source_name: &'static str,
    },

    #[error("Dimension mismatch on {axis}: expected length {expected}, got {actual}")]
    DimensionMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter '{name}': {value} (must be finite and positive)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Failed to build spatial index: measurement {index} has non-finite coordinates ({x}, {y})")]
    SpatialIndexBuild { index: usize, x: f64, y: f64 },

    #[error("Column '{column}' has no finite values to determine a range")]
    EmptyRange { column: String },

    #[error("Surrogate prediction failed: {source}")]
    Predictor {
        #[source]
        source: PredictorError,
    },

    #[error("Failed to load config '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::DimensionMismatch { .. } | Error::InvalidParameter { .. } => {
                ErrorKind::DimensionMismatch
            }
            Error::SpatialIndexBuild { .. } => ErrorKind::SpatialIndexBuild,
            Error::EmptyRange { .. } => ErrorKind::EmptyRange,
            Error::Predictor { .. } => ErrorKind::Predictor,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn missing_field(field: impl Into<String>, source_name: &'static str) -> Self {
        Error::MissingField {
            field: field.into(),
            source_name,
        }
    }
}
