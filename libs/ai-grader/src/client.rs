//! Chat-completion client for grading and question generation.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use study_core::types::QuestionType;

use crate::config::GraderConfig;
use crate::error::{GraderError, Result};
use crate::rate_limit::FixedWindowLimiter;

/// Score at or above which a graded answer counts as correct.
const PASS_MARK: f64 = 85.0;

const GRADING_SYSTEM_PROMPT: &str = "You are grading answers on an exam preparation platform. \
Compare the student's answer with the expected answer and award partial credit for partially \
correct responses. Respond with a single JSON object: {\"isCorrect\": boolean, \"score\": number \
from 0 to 100, \"feedback\": string, \"keyPointsCovered\": [string], \"missingConcepts\": \
[string]}. Respond with JSON only.";

const GENERATION_SYSTEM_PROMPT: &str = "You are writing practice questions for an exam \
preparation platform. Respond with a JSON array of question objects: {\"questionText\": string, \
\"questionType\": string, \"correctAnswer\": string, \"options\": [string] (multiple choice \
only), \"explanation\": string}. Use only the requested question types. Respond with JSON only.";

/// One answer to grade.
#[derive(Debug, Clone)]
pub struct GradeRequest {
    pub question_text: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub question_type: QuestionType,
}

/// Grading verdict, either from the model or from the local fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub is_correct: bool,
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub key_points_covered: Vec<String>,
    #[serde(default)]
    pub missing_concepts: Vec<String>,
}

/// Parameters for generating a practice question set.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub topic: String,
    pub difficulty: String,
    pub count: u32,
    pub question_types: Vec<QuestionType>,
}

/// One generated practice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

struct GraderClientInner {
    client: Client,
    config: GraderConfig,
    limiter: FixedWindowLimiter,
}

/// Client for the external grading model.
///
/// Cheap to clone: clones share the HTTP connection pool and the
/// rate-limit window.
#[derive(Clone)]
pub struct GraderClient {
    inner: Arc<GraderClientInner>,
}

impl GraderClient {
    /// Create a client from configuration.
    pub fn new(mut config: GraderConfig) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GraderError::Config(e.to_string()))?;
        let limiter = FixedWindowLimiter::new(config.max_calls_per_window, config.window);

        Ok(GraderClient {
            inner: Arc::new(GraderClientInner { client, config, limiter }),
        })
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        GraderClient::new(GraderConfig::from_env()?)
    }

    /// Grade a learner's answer.
    ///
    /// Multiple-choice and true/false answers are graded locally and
    /// never leave the process. Everything else is sent to the model;
    /// if that fails for any reason the answer is marked incorrect
    /// rather than surfacing an error.
    pub async fn grade(&self, request: &GradeRequest) -> GradingResult {
        if request.question_type.is_local_only() {
            return grade_locally(request);
        }

        match self.grade_remote(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("model grading failed, marking answer incorrect: {}", e);
                unavailable_result()
            }
        }
    }

    async fn grade_remote(&self, request: &GradeRequest) -> Result<GradingResult> {
        let prompt = build_grading_prompt(request);
        let content = self.chat_completion(GRADING_SYSTEM_PROMPT, &prompt).await?;
        parse_verdict(&content)
    }

    /// Generate a practice question set.
    ///
    /// Unlike grading, failures here surface to the caller, who decides
    /// whether to retry or fall back to stored questions.
    pub async fn generate_questions(
        &self,
        request: &GenerateRequest,
    ) -> Result<Vec<GeneratedQuestion>> {
        let prompt = build_generation_prompt(request);
        let content = self.chat_completion(GENERATION_SYSTEM_PROMPT, &prompt).await?;
        let questions: Vec<GeneratedQuestion> = serde_json::from_str(strip_code_fences(&content))
            .map_err(|e| GraderError::Parse(format!("invalid question set: {}", e)))?;
        if questions.is_empty() {
            return Err(GraderError::EmptyResponse);
        }
        tracing::info!("generated {} questions on {}", questions.len(), request.topic);
        Ok(questions)
    }

    /// Run one chat completion with rate limiting and retry.
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let policy = self.inner.config.retry.clone();
        let mut attempt = 1;
        loop {
            match self.send_chat(system_prompt, user_prompt).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                    let backoff = policy.backoff_for(attempt);
                    tracing::debug!(
                        "model request failed on attempt {}, retrying in {:?}: {}",
                        attempt,
                        backoff,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One wire attempt. Every attempt, first try or retry, consumes a
    /// rate-limit permit.
    async fn send_chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        if let Err(retry_after) = self.inner.limiter.try_acquire() {
            return Err(GraderError::Throttled { retry_after });
        }

        let url = format!("{}/chat/completions", self.inner.config.base_url);
        let body = ChatRequest {
            model: self.inner.config.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: system_prompt.to_string() },
                ChatMessage { role: "user", content: user_prompt.to_string() },
            ],
            temperature: 0.0,
        };

        let resp = self
            .inner
            .client
            .post(&url)
            .bearer_auth(&self.inner.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GraderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GraderError::Api { status, message });
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| GraderError::Parse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GraderError::EmptyResponse)
    }
}

/// Grade the closed-form question types without the model.
fn grade_locally(request: &GradeRequest) -> GradingResult {
    let check = study_core::check_answer(
        &request.user_answer,
        &request.correct_answer,
        request.question_type,
    );
    GradingResult {
        is_correct: check.is_correct,
        score: if check.is_correct { 100.0 } else { 0.0 },
        feedback: if check.is_correct {
            "Correct.".to_string()
        } else {
            format!("The correct answer is {}.", request.correct_answer)
        },
        key_points_covered: Vec::new(),
        missing_concepts: Vec::new(),
    }
}

fn unavailable_result() -> GradingResult {
    GradingResult {
        is_correct: false,
        score: 0.0,
        feedback: "Automatic grading was unavailable, so this answer was marked incorrect. \
                   Please review it against the expected answer."
            .to_string(),
        key_points_covered: Vec::new(),
        missing_concepts: Vec::new(),
    }
}

fn build_grading_prompt(request: &GradeRequest) -> String {
    format!(
        "Question ({}): {}\nExpected answer: {}\nStudent answer: {}",
        request.question_type.as_str(),
        request.question_text,
        request.correct_answer,
        request.user_answer
    )
}

fn build_generation_prompt(request: &GenerateRequest) -> String {
    let types: Vec<&str> = request.question_types.iter().map(|t| t.as_str()).collect();
    format!(
        "Generate {} {} questions about {}. Allowed question types: {}.",
        request.count,
        request.difficulty,
        request.topic,
        types.join(", ")
    )
}

/// Parse a grading verdict from model output.
///
/// The score decides correctness, so one pass mark governs grading no
/// matter what the model put in isCorrect.
fn parse_verdict(content: &str) -> Result<GradingResult> {
    let mut verdict: GradingResult = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| GraderError::Parse(format!("invalid grading verdict: {}", e)))?;
    verdict.score = verdict.score.clamp(0.0, 100.0);
    verdict.is_correct = verdict.score >= PASS_MARK;
    Ok(verdict)
}

/// Strip a markdown code fence from model output, if present.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(inner) = trimmed.strip_prefix("```") {
        let inner = inner.strip_prefix("json").unwrap_or(inner);
        let inner = inner.strip_suffix("```").unwrap_or(inner);
        inner.trim()
    } else {
        trimmed
    }
}
