// src/play/service.rs

use rand::Rng;

use super::engine::{self, Advance};
use crate::{
    error::{PlayError, StoreError},
    models::{
        play::{PlayOutcome, TerminationReason},
        quiz::{PublicQuiz, QuizId},
    },
    store::{QuizStore, SessionStore},
};

/// Runs random-play requests for one player key against the stores.
///
/// Each call loads the session, applies one transition and persists the result.
/// On any error the stored session is left as it was. Callers must not run two
/// operations for the same key concurrently.
pub struct RandomPlay<'a> {
    quizzes: &'a dyn QuizStore,
    sessions: &'a dyn SessionStore,
}

impl<'a> RandomPlay<'a> {
    pub fn new(quizzes: &'a dyn QuizStore, sessions: &'a dyn SessionStore) -> Self {
        Self { quizzes, sessions }
    }

    /// Shows the pending question, or draws a new one.
    /// Starts a fresh session when the player has none.
    pub async fn next_question<R>(&self, key: &str, rng: &mut R) -> Result<PlayOutcome, PlayError>
    where
        R: Rng,
    {
        let session = self.sessions.load(key).await?.unwrap_or_default();

        match engine::advance(session, self.quizzes, rng).await? {
            Advance::Next { quiz, session } => {
                self.sessions.save(key, &session).await?;
                tracing::debug!(quiz_id = quiz.id, score = session.score(), "random play: question shown");
                Ok(PlayOutcome::NextQuestion {
                    quiz: PublicQuiz::from(&quiz),
                    score: session.score(),
                })
            }
            Advance::Exhausted { score } => {
                self.sessions.clear(key).await?;
                tracing::info!(score, "random play: all quizzes resolved");
                Ok(PlayOutcome::Terminated {
                    final_score: score,
                    reason: TerminationReason::Exhausted,
                })
            }
        }
    }

    /// Checks `answer` for quiz `quiz_id`, which must be the pending question.
    pub async fn submit_answer(
        &self,
        key: &str,
        quiz_id: QuizId,
        answer: &str,
    ) -> Result<PlayOutcome, PlayError> {
        let session = self.sessions.load(key).await?.ok_or_else(|| {
            PlayError::InvalidState("No random play in progress".to_string())
        })?;

        if session.pending != Some(quiz_id) {
            return Err(PlayError::InvalidState(format!(
                "Quiz {} is not the current question",
                quiz_id
            )));
        }

        let quiz = self.quizzes.get(quiz_id).await.map_err(|e| match e {
            StoreError::NotFound => PlayError::NotFound(quiz_id),
            other => PlayError::from(other),
        })?;

        let checked = engine::check(session, &quiz, answer)?;

        match checked.session {
            Some(session) => {
                self.sessions.save(key, &session).await?;
                tracing::debug!(quiz_id, score = checked.score, "random play: correct answer");
                Ok(PlayOutcome::Correct {
                    score: checked.score,
                })
            }
            None => {
                self.sessions.clear(key).await?;
                tracing::info!(quiz_id, score = checked.score, "random play: wrong answer, run over");
                Ok(PlayOutcome::Terminated {
                    final_score: checked.score,
                    reason: TerminationReason::WrongAnswer,
                })
            }
        }
    }
}
