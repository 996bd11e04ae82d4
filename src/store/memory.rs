// src/store/memory.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{QuizStore, SessionStore, search_pattern};
use crate::{
    error::StoreError,
    models::{
        play::RandomPlaySession,
        quiz::{Quiz, QuizForm, QuizId},
    },
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|e| StoreError::Unavailable(e.to_string()))
}

/// Case-insensitive LIKE: `%` matches any run of characters, `_` exactly one,
/// as Postgres `ILIKE` does.
fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position after the last `%` seen, and the text position it was tried against.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                p += 1;
                backtrack = Some((p, t));
            }
            Some(&c) if c == '_' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((bp, bt)) => {
                    p = bp;
                    t = bt + 1;
                    backtrack = Some((bp, bt + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

#[derive(Default)]
struct QuizTable {
    rows: BTreeMap<QuizId, Quiz>,
    next_id: QuizId,
}

/// Simple in-memory quiz repository for testing and prototyping.
///
/// Rows live in a `BTreeMap`, so iteration order is ascending id like the SQL store.
#[derive(Clone, Default)]
pub struct InMemoryQuizStore {
    table: Arc<Mutex<QuizTable>>,
}

impl InMemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-filled with `(question, answer)` pairs, ids starting at 1.
    pub fn with_quizzes<'a, I>(quizzes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = QuizTable::default();
        for (question, answer) in quizzes {
            table.next_id += 1;
            let now = chrono::Utc::now();
            table.rows.insert(
                table.next_id,
                Quiz {
                    id: table.next_id,
                    question: question.to_string(),
                    answer: answer.to_string(),
                    created_at: Some(now),
                    updated_at: Some(now),
                },
            );
        }
        Self {
            table: Arc::new(Mutex::new(table)),
        }
    }

    fn matching(table: &QuizTable, search: Option<&str>) -> Vec<Quiz> {
        let pattern = search.map(search_pattern);
        table
            .rows
            .values()
            .filter(|q| pattern.as_deref().is_none_or(|p| like_matches(p, &q.question)))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn count(&self) -> Result<i64, StoreError> {
        Ok(lock(&self.table)?.rows.len() as i64)
    }

    async fn get(&self, id: QuizId) -> Result<Quiz, StoreError> {
        lock(&self.table)?
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn nth_excluding(&self, excluded: &[QuizId], n: i64) -> Result<Option<Quiz>, StoreError> {
        let Ok(n) = usize::try_from(n) else {
            return Ok(None);
        };
        let guard = lock(&self.table)?;
        Ok(guard
            .rows
            .values()
            .filter(|q| !excluded.contains(&q.id))
            .nth(n)
            .cloned())
    }

    async fn count_matching(&self, search: Option<&str>) -> Result<i64, StoreError> {
        let guard = lock(&self.table)?;
        Ok(Self::matching(&guard, search).len() as i64)
    }

    async fn list(&self, search: Option<&str>, offset: i64, limit: i64) -> Result<Vec<Quiz>, StoreError> {
        let guard = lock(&self.table)?;
        Ok(Self::matching(&guard, search)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn create(&self, form: &QuizForm) -> Result<Quiz, StoreError> {
        let mut guard = lock(&self.table)?;
        guard.next_id += 1;
        let now = chrono::Utc::now();
        let quiz = Quiz {
            id: guard.next_id,
            question: form.question.clone(),
            answer: form.answer.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        guard.rows.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, id: QuizId, form: &QuizForm) -> Result<Quiz, StoreError> {
        let mut guard = lock(&self.table)?;
        let quiz = guard.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        quiz.question = form.question.clone();
        quiz.answer = form.answer.clone();
        quiz.updated_at = Some(chrono::Utc::now());
        Ok(quiz.clone())
    }

    async fn delete(&self, id: QuizId) -> Result<(), StoreError> {
        lock(&self.table)?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// In-memory session store keyed by player key.
///
/// With a TTL, sessions untouched for longer than it read as absent and are
/// dropped by `purge_expired`.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, (RandomPlaySession, Instant)>>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    fn is_stale(&self, touched: Instant) -> bool {
        self.ttl.is_some_and(|ttl| touched.elapsed() >= ttl)
    }

    /// Number of stored sessions, stale ones included.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.sessions)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<RandomPlaySession>, StoreError> {
        Ok(lock(&self.sessions)?
            .get(key)
            .filter(|(_, touched)| !self.is_stale(*touched))
            .map(|(session, _)| session.clone()))
    }

    async fn save(&self, key: &str, session: &RandomPlaySession) -> Result<(), StoreError> {
        lock(&self.sessions)?.insert(key.to_string(), (session.clone(), Instant::now()));
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.sessions)?.remove(key);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let mut guard = lock(&self.sessions)?;
        let before = guard.len();
        guard.retain(|_, (_, touched)| !self.is_stale(*touched));
        Ok((before - guard.len()) as u64)
    }
}
