// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Name of the cookie carrying the signed random-play session token.
pub const SESSION_COOKIE_NAME: &str = "quiz_session";

/// Quizzes per page on the listing endpoint.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_seconds: u64,
    pub page_size: i64,
    pub bind_addr: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let session_secret = env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set");

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let page_size = env::var("QUIZ_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size: &i64| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            session_secret,
            session_ttl_seconds,
            page_size,
            bind_addr,
            rust_log,
        }
    }
}
