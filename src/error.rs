// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::models::quiz::QuizId;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., answer submitted without an active question)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Failures reported by the quiz and session stores.
#[derive(Debug)]
pub enum StoreError {
    /// The requested row does not exist.
    NotFound,

    /// The backend could not be reached or rejected the operation.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "not found"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Converts `sqlx::Error` into `StoreError`.
/// `RowNotFound` keeps its meaning, everything else is an I/O failure.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Quiz not found".to_string()),
            StoreError::Unavailable(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Errors raised by the random-play engine.
#[derive(Debug, PartialEq, Eq)]
pub enum PlayError {
    /// A quiz referenced by the session vanished from the store.
    NotFound(QuizId),

    /// An answer was submitted with no matching pending question.
    InvalidState(String),

    /// A collaborator failed; the session was left untouched.
    StoreUnavailable(String),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NotFound(id) => write!(f, "There is no quiz with id={}", id),
            PlayError::InvalidState(msg) => write!(f, "{}", msg),
            PlayError::StoreUnavailable(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PlayError {}

impl From<StoreError> for PlayError {
    fn from(err: StoreError) -> Self {
        match err {
            // A bare NotFound from the store has no id attached; callers that know
            // the id map it themselves.
            StoreError::NotFound => PlayError::StoreUnavailable("unexpected missing row".to_string()),
            StoreError::Unavailable(msg) => PlayError::StoreUnavailable(msg),
        }
    }
}

impl From<PlayError> for AppError {
    fn from(err: PlayError) -> Self {
        match err {
            PlayError::NotFound(id) => AppError::NotFound(format!("There is no quiz with id={}", id)),
            PlayError::InvalidState(msg) => AppError::Conflict(msg),
            PlayError::StoreUnavailable(msg) => AppError::InternalServerError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_errors_map_to_http_statuses() {
        let cases = [
            (PlayError::NotFound(7), StatusCode::NOT_FOUND),
            (
                PlayError::InvalidState("no active question".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                PlayError::StoreUnavailable("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn row_not_found_stays_not_found() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }
}
