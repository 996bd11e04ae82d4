// src/play/engine.rs

//! Random-play transitions.
//!
//! These functions take the current session by value and hand back the next one.
//! Nothing here touches the session store; the caller persists the result.

use rand::Rng;

use crate::{
    error::{PlayError, StoreError},
    models::{play::RandomPlaySession, quiz::Quiz},
    store::QuizStore,
};

/// Trims surrounding whitespace and lowercases. Inner whitespace is kept as is.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub fn answers_match(submitted: &str, expected: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(expected)
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// A question to show. `session` has `pending` set to its id.
    Next { quiz: Quiz, session: RandomPlaySession },
    /// Every quiz has been resolved. The session must be cleared.
    Exhausted { score: usize },
}

/// Result of checking an answer against the pending question.
#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    pub correct: bool,
    pub score: usize,
    /// The session to persist, or `None` when the run is over.
    pub session: Option<RandomPlaySession>,
}

/// Selects the question to show next.
///
/// A pending question is shown again unchanged, so reloading the page never
/// skips or rerolls a question. Otherwise a uniformly random quiz is drawn from
/// those not yet resolved.
pub async fn advance<R>(
    mut session: RandomPlaySession,
    store: &dyn QuizStore,
    rng: &mut R,
) -> Result<Advance, PlayError>
where
    R: Rng,
{
    if let Some(id) = session.pending {
        let quiz = store.get(id).await.map_err(|e| match e {
            StoreError::NotFound => PlayError::NotFound(id),
            other => PlayError::from(other),
        })?;
        return Ok(Advance::Next { quiz, session });
    }

    let total = store.count().await?;
    let remaining = total - session.score() as i64;

    if remaining <= 0 {
        return Ok(Advance::Exhausted {
            score: session.score(),
        });
    }

    let offset = rng.random_range(0..remaining);
    let excluded: Vec<_> = session.resolved.iter().copied().collect();

    match store.nth_excluding(&excluded, offset).await? {
        Some(quiz) => {
            session.pending = Some(quiz.id);
            Ok(Advance::Next { quiz, session })
        }
        // Quizzes were deleted after `count`; nothing left at that offset.
        None => Ok(Advance::Exhausted {
            score: session.score(),
        }),
    }
}

/// Checks `answer` against `quiz`, which must be the session's pending question.
///
/// A correct answer resolves the quiz and keeps the session. A wrong answer ends
/// the run; the reported score is the one reached before the mistake.
pub fn check(
    mut session: RandomPlaySession,
    quiz: &Quiz,
    answer: &str,
) -> Result<Checked, PlayError> {
    match session.pending {
        Some(id) if id == quiz.id => {}
        Some(id) => {
            return Err(PlayError::InvalidState(format!(
                "Answer submitted for quiz {} but quiz {} is pending",
                quiz.id, id
            )));
        }
        None => {
            return Err(PlayError::InvalidState(
                "No question is pending in this session".to_string(),
            ));
        }
    }

    if !answers_match(answer, &quiz.answer) {
        return Ok(Checked {
            correct: false,
            score: session.score(),
            session: None,
        });
    }

    session.pending = None;
    session.resolved.insert(quiz.id);

    Ok(Checked {
        correct: true,
        score: session.score(),
        session: Some(session),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        models::quiz::{QuizForm, QuizId},
        store::InMemoryQuizStore,
    };

    fn quiz(id: i64, answer: &str) -> Quiz {
        Quiz {
            id,
            question: format!("Question {id}"),
            answer: answer.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn pending(resolved: &[i64], pending: Option<i64>) -> RandomPlaySession {
        RandomPlaySession {
            resolved: resolved.iter().copied().collect(),
            pending,
        }
    }

    #[test]
    fn normalization_trims_and_folds_case() {
        assert!(answers_match(" Paris  ", "paris"));
        assert!(answers_match("PARIS", "  Paris"));
        assert!(!answers_match("par is", "paris"));
        assert!(!answers_match("new  york", "new york"));
    }

    #[tokio::test]
    async fn advance_never_repeats_until_exhausted() {
        let store = InMemoryQuizStore::with_quizzes([
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "5"),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = RandomPlaySession::new();
        let mut seen = HashSet::new();

        loop {
            match advance(session, &store, &mut rng).await.unwrap() {
                Advance::Next { quiz, session: next } => {
                    assert!(seen.insert(quiz.id), "quiz {} shown twice", quiz.id);
                    assert_eq!(next.pending, Some(quiz.id));
                    let checked = check(next, &quiz, &quiz.answer).unwrap();
                    assert!(checked.correct);
                    assert_eq!(checked.score, seen.len());
                    session = checked.session.unwrap();
                }
                Advance::Exhausted { score } => {
                    assert_eq!(score, 5);
                    break;
                }
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[tokio::test]
    async fn advance_with_pending_is_idempotent() {
        let store = InMemoryQuizStore::with_quizzes([("a", "1"), ("b", "2"), ("c", "3")]);
        let mut rng = StdRng::seed_from_u64(1);

        let Advance::Next { quiz: first, session } =
            advance(pending(&[1], None), &store, &mut rng).await.unwrap()
        else {
            panic!("expected a question");
        };

        for _ in 0..5 {
            let Advance::Next { quiz, session: again } =
                advance(session.clone(), &store, &mut rng).await.unwrap()
            else {
                panic!("expected a question");
            };
            assert_eq!(quiz, first);
            assert_eq!(again, session);
        }
    }

    #[tokio::test]
    async fn advance_on_empty_store_is_exhausted() {
        let store = InMemoryQuizStore::new();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(RandomPlaySession::new(), &store, &mut rng).await.unwrap();
        assert_eq!(outcome, Advance::Exhausted { score: 0 });
    }

    #[tokio::test]
    async fn advance_reports_vanished_pending_quiz() {
        let store = InMemoryQuizStore::with_quizzes([("a", "1")]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = advance(pending(&[], Some(42)), &store, &mut rng)
            .await
            .unwrap_err();
        assert_eq!(err, PlayError::NotFound(42));
    }

    #[tokio::test]
    async fn advance_is_exhausted_when_catalog_shrinks() {
        // Resolved ids that were later deleted still count against the total.
        let store = InMemoryQuizStore::with_quizzes([("a", "1"), ("b", "2")]);
        store.delete(2).await.unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(pending(&[1, 7], None), &store, &mut rng).await.unwrap();
        assert_eq!(outcome, Advance::Exhausted { score: 2 });
    }

    /// Quiz store whose rows disappear between `count` and `nth_excluding`.
    struct VanishingRows {
        reported: i64,
    }

    #[async_trait]
    impl QuizStore for VanishingRows {
        async fn count(&self) -> Result<i64, StoreError> {
            Ok(self.reported)
        }

        async fn get(&self, _id: QuizId) -> Result<Quiz, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn nth_excluding(&self, _excluded: &[QuizId], _n: i64) -> Result<Option<Quiz>, StoreError> {
            Ok(None)
        }

        async fn count_matching(&self, _search: Option<&str>) -> Result<i64, StoreError> {
            Ok(self.reported)
        }

        async fn list(&self, _search: Option<&str>, _offset: i64, _limit: i64) -> Result<Vec<Quiz>, StoreError> {
            Ok(Vec::new())
        }

        async fn create(&self, _form: &QuizForm) -> Result<Quiz, StoreError> {
            Err(StoreError::Unavailable("read only".to_string()))
        }

        async fn update(&self, _id: QuizId, _form: &QuizForm) -> Result<Quiz, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn delete(&self, _id: QuizId) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }
    }

    #[tokio::test]
    async fn advance_is_exhausted_when_rows_vanish_after_count() {
        let store = VanishingRows { reported: 5 };
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = advance(pending(&[1, 2], None), &store, &mut rng).await.unwrap();
        assert_eq!(outcome, Advance::Exhausted { score: 2 });

        let outcome = advance(RandomPlaySession::new(), &store, &mut rng).await.unwrap();
        assert_eq!(outcome, Advance::Exhausted { score: 0 });
    }

    #[test]
    fn wrong_answer_terminates_with_previous_score() {
        let checked = check(pending(&[1, 2], Some(3)), &quiz(3, "Paris"), "London").unwrap();

        assert_eq!(
            checked,
            Checked {
                correct: false,
                score: 2,
                session: None,
            }
        );
    }

    #[test]
    fn correct_answer_resolves_and_clears_pending() {
        let checked = check(pending(&[1], Some(3)), &quiz(3, "Paris"), " paris ").unwrap();

        assert!(checked.correct);
        assert_eq!(checked.score, 2);
        assert_eq!(checked.session, Some(pending(&[1, 3], None)));
    }

    #[test]
    fn check_requires_matching_pending_quiz() {
        let none = check(pending(&[1], None), &quiz(3, "x"), "x").unwrap_err();
        assert!(matches!(none, PlayError::InvalidState(_)));

        let other = check(pending(&[1], Some(4)), &quiz(3, "x"), "x").unwrap_err();
        assert!(matches!(other, PlayError::InvalidState(_)));
    }

    #[test]
    fn resolved_never_double_counts() {
        // A session that somehow already holds the pending id still scores it once.
        let session = RandomPlaySession {
            resolved: [3].into_iter().collect(),
            pending: Some(3),
        };
        let checked = check(session, &quiz(3, "x"), "x").unwrap();
        assert_eq!(checked.score, 1);
    }
}
