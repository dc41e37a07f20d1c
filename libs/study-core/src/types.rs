//! Core types for practice questions and review state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, Result};

/// The kind of practice question being asked.
///
/// The set is closed: every consumer matches exhaustively, so adding a
/// variant is a compile-visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    ShortAnswer,
    ProblemSolving,
    Essay,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FillInBlank => "fill_in_blank",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::ProblemSolving => "problem_solving",
            QuestionType::Essay => "essay",
        }
    }

    /// Parse from a string. Accepts the snake_case identifiers plus the
    /// human-readable labels used in exported question sheets.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "multiple_choice" | "Multiple Choice" => Some(QuestionType::MultipleChoice),
            "true_false" | "True/False" => Some(QuestionType::TrueFalse),
            "fill_in_blank" | "Fill in the Blank" => Some(QuestionType::FillInBlank),
            "short_answer" | "Short Answer" => Some(QuestionType::ShortAnswer),
            "problem_solving" | "Problem Solving" => Some(QuestionType::ProblemSolving),
            "essay" | "Essay" => Some(QuestionType::Essay),
            _ => None,
        }
    }

    /// Types that are always graded locally, never sent to a model.
    pub fn is_local_only(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

/// One graded point inside an essay rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredPoint {
    pub point: String,
    pub weight: f64,
}

/// Grading rubric for essay and long-form short answers.
///
/// Stored as JSON in the authoritative answer field, with camelCase keys
/// for compatibility with the web client that writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingCriteria {
    #[serde(default)]
    pub required_points: Vec<RequiredPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_word_count: Option<usize>,
}

impl GradingCriteria {
    /// Parse a rubric from the raw authoritative answer field.
    pub fn parse(raw: &str) -> Result<Self> {
        let criteria: GradingCriteria = serde_json::from_str(raw)?;
        if let (Some(min), Some(max)) = (criteria.min_word_count, criteria.max_word_count) {
            if min > max {
                return Err(CriteriaError::InvalidWordBounds { min, max });
            }
        }
        Ok(criteria)
    }

    /// Whether a raw answer field looks like a JSON rubric rather than
    /// literal answer text.
    pub fn looks_like_criteria(raw: &str) -> bool {
        raw.trim_start().starts_with('{')
    }
}

/// Spaced repetition state for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub question_id: String,
    pub topic: String,
    pub difficulty: String,
    pub last_reviewed: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
    pub review_count: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub streak: u32,
}

impl ReviewItem {
    /// Create a fresh item that is due immediately.
    pub fn new(question_id: String, topic: String, difficulty: String, now: DateTime<Utc>) -> Self {
        ReviewItem {
            question_id,
            topic,
            difficulty,
            last_reviewed: now,
            next_review: now,
            review_count: 0,
            ease_factor: 2.5,
            interval_days: 1,
            correct_count: 0,
            incorrect_count: 0,
            streak: 0,
        }
    }

    /// Whether this item is due for review at the given time.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// Aggregate progress metrics over a review collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    /// Size of the due subset.
    pub review: usize,
    pub daily_target: usize,
}
