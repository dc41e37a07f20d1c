//! Core study logic shared by the practice and review features.
//!
//! This crate is pure and synchronous. It provides:
//! - Answer normalization and equivalence checking per question type
//! - Spaced repetition scheduling (SM-2 family)
//! - Adaptive difficulty recommendations from recent performance
//! - Shared domain types

pub mod adaptive;
pub mod checking;
pub mod error;
pub mod scheduler;
pub mod types;

pub use adaptive::{AttemptRecord, DifficultyShift, PerformanceWindow};
pub use checking::{check_answer, normalize_answer, AnswerCheck, CheckMethod};
pub use error::{CriteriaError, Result};
pub use scheduler::{apply_review, due_items, review_stats};
pub use types::{GradingCriteria, QuestionType, RequiredPoint, ReviewItem, ReviewStats};
