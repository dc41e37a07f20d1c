//! Error types for study-core.

use thiserror::Error;

/// Result type alias using CriteriaError.
pub type Result<T> = std::result::Result<T, CriteriaError>;

/// Errors that can occur when reading a grading rubric.
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("Invalid criteria JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Word count bounds are inverted: minimum {min} exceeds maximum {max}")]
    InvalidWordBounds { min: usize, max: usize },
}
