//! Answer equivalence checking.
//!
//! Decides whether a learner's free-text answer matches the
//! authoritative one, with per-question-type rules layered over a
//! shared normalization pass.

pub mod normalize;
pub mod numeric;
pub mod similarity;

pub use normalize::normalize_answer;
pub use numeric::{extract_number, is_numerically_equal};
pub use similarity::{levenshtein_distance, normalized_similarity, SIMILARITY_THRESHOLD};

use serde::{Deserialize, Serialize};

use crate::types::{GradingCriteria, QuestionType};

/// The rule that decided an answer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMethod {
    /// Normalized strings were identical.
    Exact,
    /// Both sides resolved to the same boolean through the alias table.
    BooleanAlias,
    /// Values matched within numeric tolerance.
    Numeric,
    /// Edit-distance similarity reached the threshold.
    Similarity,
    /// Rubric answer passed through for external grading.
    Criteria,
    /// No rule matched.
    None,
}

/// Result of checking a learner's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    pub method: CheckMethod,
    /// Similarity score, present when the fuzzy rule was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    pub user_normalized: String,
    pub expected_normalized: String,
    /// Note for the learner, present when the checker has something to
    /// say beyond the verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Check a learner's answer against the authoritative one.
///
/// Rules by question type:
/// - Multiple choice: normalized exact match only
/// - True/false: normalized exact match, plus a raw true/t, false/f
///   alias check
/// - Fill in the blank and short answer: exact, then numeric tolerance,
///   then similarity at the threshold
/// - Problem solving: exact, then numeric tolerance
/// - Essay, and short answers whose authoritative side is a JSON
///   rubric: never failed locally; the rubric is logged for the
///   external grader and the answer passes through
pub fn check_answer(user_answer: &str, correct_answer: &str, question_type: QuestionType) -> AnswerCheck {
    match question_type {
        QuestionType::MultipleChoice => exact_only(user_answer, correct_answer),
        QuestionType::TrueFalse => true_false(user_answer, correct_answer),
        QuestionType::ShortAnswer if GradingCriteria::looks_like_criteria(correct_answer) => {
            criteria_pass_through(user_answer, correct_answer)
        }
        QuestionType::FillInBlank | QuestionType::ShortAnswer => {
            fuzzy_text(user_answer, correct_answer)
        }
        QuestionType::ProblemSolving => numeric_only(user_answer, correct_answer),
        QuestionType::Essay => criteria_pass_through(user_answer, correct_answer),
    }
}

fn exact_only(user_answer: &str, correct_answer: &str) -> AnswerCheck {
    let user_normalized = normalize_answer(user_answer);
    let expected_normalized = normalize_answer(correct_answer);
    let is_correct = user_normalized == expected_normalized;
    AnswerCheck {
        is_correct,
        method: if is_correct { CheckMethod::Exact } else { CheckMethod::None },
        similarity: None,
        user_normalized,
        expected_normalized,
        feedback: None,
    }
}

fn true_false(user_answer: &str, correct_answer: &str) -> AnswerCheck {
    let user_normalized = normalize_answer(user_answer);
    let expected_normalized = normalize_answer(correct_answer);
    if user_normalized == expected_normalized {
        return AnswerCheck {
            is_correct: true,
            method: CheckMethod::Exact,
            similarity: None,
            user_normalized,
            expected_normalized,
            feedback: None,
        };
    }
    let alias_match = match (boolean_alias(user_answer), boolean_alias(correct_answer)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    AnswerCheck {
        is_correct: alias_match,
        method: if alias_match { CheckMethod::BooleanAlias } else { CheckMethod::None },
        similarity: None,
        user_normalized,
        expected_normalized,
        feedback: None,
    }
}

/// Raw aliases accepted on true/false questions before normalization.
fn boolean_alias(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}

fn fuzzy_text(user_answer: &str, correct_answer: &str) -> AnswerCheck {
    let user_normalized = normalize_answer(user_answer);
    let expected_normalized = normalize_answer(correct_answer);
    if user_normalized == expected_normalized {
        return AnswerCheck {
            is_correct: true,
            method: CheckMethod::Exact,
            similarity: None,
            user_normalized,
            expected_normalized,
            feedback: None,
        };
    }
    if numeric::is_numerically_equal(&user_normalized, &expected_normalized) {
        return AnswerCheck {
            is_correct: true,
            method: CheckMethod::Numeric,
            similarity: None,
            user_normalized,
            expected_normalized,
            feedback: None,
        };
    }
    let score = similarity::normalized_similarity(&user_normalized, &expected_normalized);
    let is_correct = score >= similarity::SIMILARITY_THRESHOLD;
    AnswerCheck {
        is_correct,
        method: if is_correct { CheckMethod::Similarity } else { CheckMethod::None },
        similarity: Some(score),
        user_normalized,
        expected_normalized,
        feedback: if is_correct {
            Some("Accepted with a small spelling difference.".to_string())
        } else {
            None
        },
    }
}

fn numeric_only(user_answer: &str, correct_answer: &str) -> AnswerCheck {
    let user_normalized = normalize_answer(user_answer);
    let expected_normalized = normalize_answer(correct_answer);
    if user_normalized == expected_normalized {
        return AnswerCheck {
            is_correct: true,
            method: CheckMethod::Exact,
            similarity: None,
            user_normalized,
            expected_normalized,
            feedback: None,
        };
    }
    let is_correct = numeric::is_numerically_equal(&user_normalized, &expected_normalized);
    AnswerCheck {
        is_correct,
        method: if is_correct { CheckMethod::Numeric } else { CheckMethod::None },
        similarity: None,
        user_normalized,
        expected_normalized,
        feedback: None,
    }
}

/// Rubric answers are never failed locally; the external grader owns
/// the verdict. Locally we inspect the word count and log what the
/// grader will be asked to check.
fn criteria_pass_through(user_answer: &str, raw_criteria: &str) -> AnswerCheck {
    let word_count = user_answer.split_whitespace().count();
    let mut feedback = None;

    match GradingCriteria::parse(raw_criteria) {
        Ok(criteria) => {
            if let Some(min) = criteria.min_word_count {
                if word_count < min {
                    tracing::warn!("answer has {} words, below the minimum of {}", word_count, min);
                    feedback = Some(format!(
                        "Your answer is {} words; the rubric asks for at least {}.",
                        word_count, min
                    ));
                }
            }
            if let Some(max) = criteria.max_word_count {
                if word_count > max {
                    tracing::warn!("answer has {} words, above the maximum of {}", word_count, max);
                    feedback = Some(format!(
                        "Your answer is {} words; the rubric asks for at most {}.",
                        word_count, max
                    ));
                }
            }
            for point in &criteria.required_points {
                tracing::debug!(
                    "rubric point deferred to external grading: {} (weight {})",
                    point.point,
                    point.weight
                );
            }
        }
        Err(e) => {
            tracing::warn!("unreadable grading rubric, passing answer through: {}", e);
        }
    }

    AnswerCheck {
        is_correct: true,
        method: CheckMethod::Criteria,
        similarity: None,
        user_normalized: user_answer.trim().to_string(),
        expected_normalized: raw_criteria.trim().to_string(),
        feedback,
    }
}
