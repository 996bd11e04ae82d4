// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use quiz_backend::{
    config::Config,
    routes,
    state::AppState,
    store::{InMemoryQuizStore, InMemorySessionStore},
};

pub struct TestApp {
    pub address: String,
    pub quizzes: InMemoryQuizStore,
    pub sessions: InMemorySessionStore,
}

/// Spawns the app on a random port backed by in-memory stores.
pub async fn spawn_app(quizzes: InMemoryQuizStore) -> TestApp {
    let sessions = InMemorySessionStore::new();

    let config = Config {
        database_url: String::new(),
        session_secret: "test_secret_for_integration_tests".to_string(),
        session_ttl_seconds: 600,
        page_size: 2,
        bind_addr: "127.0.0.1:0".to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState {
        config,
        quizzes: Arc::new(quizzes.clone()),
        sessions: Arc::new(sessions.clone()),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        quizzes,
        sessions,
    }
}

/// Extracts `name=value` from the response's `Set-Cookie` header, ready to send back.
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
