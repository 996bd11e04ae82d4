// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

pub type QuizId = i64;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,

    /// The text shown to the player.
    pub question: String,

    /// The expected answer. Compared case-insensitively after trimming.
    pub answer: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a quiz to a player (excludes the answer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuiz {
    pub id: QuizId,
    pub question: String,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            question: quiz.question.clone(),
        }
    }
}

/// DTO for creating or editing a quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizForm {
    #[validate(
        length(min = 1, message = "Question must not be empty"),
        custom(function = validate_max_chars)
    )]
    pub question: String,
    #[validate(
        length(min = 1, message = "Answer must not be empty"),
        custom(function = validate_max_chars)
    )]
    pub answer: String,
}

pub const MAX_FIELD_CHARS: usize = 1000;

fn validate_max_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(validator::ValidationError::new("too_long").with_message(
            format!("must be at most {} characters", MAX_FIELD_CHARS).into(),
        ));
    }
    Ok(())
}

impl QuizForm {
    /// Trims both fields and strips unsafe markup from the question.
    /// Call before `validate` so whitespace-only input is rejected.
    pub fn sanitized(self) -> Self {
        Self {
            question: crate::utils::html::clean_html(self.question.trim()),
            answer: self.answer.trim().to_string(),
        }
    }
}

/// Query parameters for listing quizzes.
#[derive(Debug, Default, Deserialize)]
pub struct QuizListParams {
    /// Free-text search over the question; spaces act as wildcards.
    pub search: Option<String>,

    /// 1-based page number. Anything unparsable falls back to the first page.
    pub pageno: Option<String>,
}

impl QuizListParams {
    pub fn page(&self) -> i64 {
        self.pageno
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Rows to skip for the requested page. `None` when the page lies beyond
    /// any addressable offset.
    pub fn offset(&self, page_size: i64) -> Option<i64> {
        page_size.checked_mul(self.page() - 1)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A single page of the quiz listing.
#[derive(Debug, Serialize)]
pub struct QuizPage {
    pub quizzes: Vec<Quiz>,
    pub total: i64,
    pub pageno: i64,
    pub page_size: i64,
    pub search: String,
}

/// Query parameters carrying a player's answer.
#[derive(Debug, Default, Deserialize)]
pub struct AnswerParams {
    #[serde(default)]
    pub answer: String,
}
