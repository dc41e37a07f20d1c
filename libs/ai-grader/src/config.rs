//! Grading client configuration.

use std::time::Duration;

use crate::error::{GraderError, Result};
use crate::retry::RetryPolicy;

/// Default chat-completion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the grading API client.
#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// Base URL of the chat-completion API.
    pub base_url: String,
    /// Bearer token sent with each request.
    pub api_key: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// Maximum outbound calls per rate-limit window.
    pub max_calls_per_window: u32,
    /// Length of the rate-limit window.
    pub window: Duration,
}

impl GraderConfig {
    /// Create a config with defaults for everything except the endpoint
    /// and key.
    pub fn new(base_url: String, api_key: String) -> Self {
        GraderConfig {
            base_url,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            max_calls_per_window: 5,
            window: Duration::from_secs(60),
        }
    }

    /// Read configuration from the environment.
    ///
    /// GRADER_API_KEY is required. GRADER_API_URL and GRADER_MODEL are
    /// optional and fall back to the OpenAI defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GRADER_API_KEY")
            .map_err(|_| GraderError::Config("GRADER_API_KEY not set".to_string()))?;
        let base_url =
            std::env::var("GRADER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GRADER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let mut config = GraderConfig::new(base_url, api_key);
        config.model = model;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_in_defaults() {
        let config = GraderConfig::new(
            "https://api.example.com/v1".to_string(),
            "sk-test".to_string(),
        );
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_calls_per_window, 5);
        assert_eq!(config.window, Duration::from_secs(60));
        assert_eq!(config.retry, RetryPolicy::default());
    }
}
