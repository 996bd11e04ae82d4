// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::quiz::{AnswerParams, PublicQuiz, QuizForm, QuizId, QuizListParams, QuizPage},
    play::answers_match,
    store::QuizStore,
};

/// Lists quizzes, optionally filtered by a search term, one page at a time.
pub async fn list_quizzes(
    State(quizzes): State<Arc<dyn QuizStore>>,
    State(config): State<Config>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let search = params.search_term();
    let pageno = params.page();
    let page_size = config.page_size;

    let total = quizzes.count_matching(search).await?;
    let items = match params.offset(page_size) {
        Some(offset) => quizzes.list(search, offset, page_size).await?,
        None => Vec::new(),
    };

    Ok(Json(QuizPage {
        quizzes: items,
        total,
        pageno,
        page_size,
        search: search.unwrap_or_default().to_string(),
    }))
}

/// Retrieves a single quiz by ID.
pub async fn get_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quizzes.get(id).await?;
    Ok(Json(quiz))
}

/// Creates a new quiz.
/// Returns 201 Created and the stored quiz.
pub async fn create_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Json(payload): Json<QuizForm>,
) -> Result<impl IntoResponse, AppError> {
    let form = payload.sanitized();
    if let Err(validation_errors) = form.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = quizzes.create(&form).await?;
    tracing::info!("Quiz {} created", quiz.id);

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Replaces the question and answer of a quiz.
pub async fn update_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<QuizId>,
    Json(payload): Json<QuizForm>,
) -> Result<impl IntoResponse, AppError> {
    let form = payload.sanitized();
    if let Err(validation_errors) = form.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let quiz = quizzes.update(id, &form).await?;
    Ok(Json(quiz))
}

/// Deletes a quiz by ID.
pub async fn delete_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<QuizId>,
) -> Result<impl IntoResponse, AppError> {
    quizzes.delete(id).await?;
    tracing::info!("Quiz {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Shows a quiz to answer, echoing back any previous attempt.
pub async fn play_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<QuizId>,
    Query(params): Query<AnswerParams>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quizzes.get(id).await?;

    Ok(Json(json!({
        "quiz": PublicQuiz::from(&quiz),
        "answer": params.answer,
    })))
}

/// Checks an answer for a single quiz. Stateless: nothing is recorded.
pub async fn check_quiz(
    State(quizzes): State<Arc<dyn QuizStore>>,
    Path(id): Path<QuizId>,
    Query(params): Query<AnswerParams>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quizzes.get(id).await?;
    let result = answers_match(&params.answer, &quiz.answer);

    Ok(Json(json!({
        "quiz_id": quiz.id,
        "answer": params.answer,
        "result": result,
    })))
}
