//! Client for LLM-backed grading and question generation.
//!
//! Wraps a chat-completion API with request retry, a fixed-window rate
//! limit, and fail-closed grading: when grading cannot be completed the
//! answer is reported incorrect, never as an error to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod retry;

pub use client::{
    GenerateRequest, GeneratedQuestion, GradeRequest, GraderClient, GradingResult,
};
pub use config::GraderConfig;
pub use error::{GraderError, Result};
pub use rate_limit::{Clock, FixedWindowLimiter, SystemClock};
pub use retry::RetryPolicy;
