//! Error types for the grading client.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using GraderError.
pub type Result<T> = std::result::Result<T, GraderError>;

/// Errors from the grading API client.
#[derive(Debug, Error)]
pub enum GraderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited locally, retry after {retry_after:?}")]
    Throttled { retry_after: Duration },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

impl GraderError {
    /// Whether a retry of the same request may succeed.
    ///
    /// Network failures and server-side 429/5xx responses are worth
    /// retrying. Local throttling is not: the window is longer than any
    /// backoff, so a retry would only burn another permit.
    pub fn is_transient(&self) -> bool {
        match self {
            GraderError::Network(_) => true,
            GraderError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
