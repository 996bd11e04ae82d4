// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use super::{QuizStore, SessionStore, search_pattern};
use crate::{
    error::StoreError,
    models::{
        play::RandomPlaySession,
        quiz::{Quiz, QuizForm, QuizId},
    },
};

const QUIZ_COLUMNS: &str = "id, question, answer, created_at, updated_at";

/// Postgres-backed quiz repository.
#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn count(&self) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn get(&self, id: QuizId) -> Result<Quiz, StoreError> {
        sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn nth_excluding(&self, excluded: &[QuizId], n: i64) -> Result<Option<Quiz>, StoreError> {
        // `<> ALL('{}')` is true, so an empty exclusion list selects every row.
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            SELECT {QUIZ_COLUMNS}
            FROM quizzes
            WHERE id <> ALL($1)
            ORDER BY id
            OFFSET $2
            LIMIT 1
            "#
        ))
        .bind(excluded)
        .bind(n)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to select quiz at offset {}: {:?}", n, e);
            StoreError::from(e)
        })?;

        Ok(quiz)
    }

    async fn count_matching(&self, search: Option<&str>) -> Result<i64, StoreError> {
        let pattern = search.map(search_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quizzes WHERE ($1::TEXT IS NULL OR question ILIKE $1)",
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn list(&self, search: Option<&str>, offset: i64, limit: i64) -> Result<Vec<Quiz>, StoreError> {
        let pattern = search.map(search_pattern);

        let quizzes = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            SELECT {QUIZ_COLUMNS}
            FROM quizzes
            WHERE ($1::TEXT IS NULL OR question ILIKE $1)
            ORDER BY id
            LIMIT $2
            OFFSET $3
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(quizzes)
    }

    async fn create(&self, form: &QuizForm) -> Result<Quiz, StoreError> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            INSERT INTO quizzes (question, answer)
            VALUES ($1, $2)
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&form.question)
        .bind(&form.answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(quiz)
    }

    async fn update(&self, id: QuizId, form: &QuizForm) -> Result<Quiz, StoreError> {
        sqlx::query_as::<_, Quiz>(&format!(
            r#"
            UPDATE quizzes
            SET question = $1, answer = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&form.question)
        .bind(&form.answer)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: QuizId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

/// Postgres-backed session store. Each session is one JSONB row keyed by player key.
///
/// Rows whose `updated_at` is older than the TTL read as absent and are removed
/// by `purge_expired`.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
    ttl_seconds: f64,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, ttl_seconds: u64) -> Self {
        Self {
            pool,
            ttl_seconds: ttl_seconds as f64,
        }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, key: &str) -> Result<Option<RandomPlaySession>, StoreError> {
        let data: Option<Json<RandomPlaySession>> = sqlx::query_scalar(
            r#"
            SELECT data
            FROM play_sessions
            WHERE session_key = $1
              AND updated_at >= NOW() - make_interval(secs => $2)
            "#,
        )
        .bind(key)
        .bind(self.ttl_seconds)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data.map(|Json(session)| session))
    }

    async fn save(&self, key: &str, session: &RandomPlaySession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO play_sessions (session_key, data)
            VALUES ($1, $2)
            ON CONFLICT (session_key) DO UPDATE SET
                data = EXCLUDED.data,
                updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(Json(session))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save play session: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM play_sessions WHERE session_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "DELETE FROM play_sessions WHERE updated_at < NOW() - make_interval(secs => $1)",
        )
        .bind(self.ttl_seconds)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to purge expired play sessions: {:?}", e);
            StoreError::from(e)
        })?;

        Ok(result.rows_affected())
    }
}
