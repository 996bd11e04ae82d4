// src/handlers/random.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::AppError,
    models::quiz::{AnswerParams, QuizId},
    play::RandomPlay,
    store::{QuizStore, SessionStore},
    utils::session_token::PlayerKey,
};

/// Shows the current random-play question, drawing a new one if none is pending.
///
/// Ends the run with `exhausted` once every quiz has been answered.
pub async fn random_play(
    State(quizzes): State<Arc<dyn QuizStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Extension(PlayerKey(key)): Extension<PlayerKey>,
) -> Result<impl IntoResponse, AppError> {
    let mut rng = StdRng::from_os_rng();
    let outcome = RandomPlay::new(quizzes.as_ref(), sessions.as_ref())
        .next_question(&key, &mut rng)
        .await
        .map_err(|e| {
            tracing::warn!("Random play failed: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(outcome))
}

/// Checks the answer to the pending random-play question.
///
/// A wrong answer ends the run and reports the score reached so far.
pub async fn random_check(
    State(quizzes): State<Arc<dyn QuizStore>>,
    State(sessions): State<Arc<dyn SessionStore>>,
    Extension(PlayerKey(key)): Extension<PlayerKey>,
    Path(id): Path<QuizId>,
    Query(params): Query<AnswerParams>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = RandomPlay::new(quizzes.as_ref(), sessions.as_ref())
        .submit_answer(&key, id, &params.answer)
        .await
        .map_err(|e| {
            tracing::warn!("Random check for quiz {} failed: {}", id, e);
            AppError::from(e)
        })?;

    Ok(Json(outcome))
}
