// src/store/mod.rs

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::{
    error::StoreError,
    models::{
        play::RandomPlaySession,
        quiz::{Quiz, QuizForm, QuizId},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryQuizStore, InMemorySessionStore};
pub use postgres::{PgQuizStore, PgSessionStore};

/// Repository contract for quizzes.
///
/// All positional operations use ascending id as the stable ordering.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Total number of quizzes.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if missing, or other storage errors.
    async fn get(&self, id: QuizId) -> Result<Quiz, StoreError>;

    /// The quiz at zero-based position `n` among those whose id is not in `excluded`.
    /// `Ok(None)` when fewer than `n + 1` such quizzes exist.
    async fn nth_excluding(&self, excluded: &[QuizId], n: i64) -> Result<Option<Quiz>, StoreError>;

    /// Number of quizzes whose question matches the optional search term.
    async fn count_matching(&self, search: Option<&str>) -> Result<i64, StoreError>;

    /// A page of quizzes matching the optional search term.
    async fn list(&self, search: Option<&str>, offset: i64, limit: i64) -> Result<Vec<Quiz>, StoreError>;

    async fn create(&self, form: &QuizForm) -> Result<Quiz, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the quiz does not exist.
    async fn update(&self, id: QuizId, form: &QuizForm) -> Result<Quiz, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the quiz does not exist.
    async fn delete(&self, id: QuizId) -> Result<(), StoreError>;
}

/// Durable holder of one random-play session per player key.
///
/// Sessions idle for longer than the store's TTL read as absent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<RandomPlaySession>, StoreError>;

    async fn save(&self, key: &str, session: &RandomPlaySession) -> Result<(), StoreError>;

    /// Removes the session. Clearing an absent key is not an error.
    async fn clear(&self, key: &str) -> Result<(), StoreError>;

    /// Deletes sessions that outlived their TTL and returns how many went.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(" +").expect("valid regex"));

/// Builds a LIKE pattern from a search box entry: runs of spaces become wildcards.
///
/// `"capital  France"` becomes `"%capital%France%"`.
pub fn search_pattern(search: &str) -> String {
    format!("%{}%", SPACES.replace_all(search, "%"))
}
