// tests/random_play_tests.rs

mod common;

use std::collections::HashSet;

use common::{TestApp, session_cookie, spawn_app};
use quiz_backend::store::{InMemoryQuizStore, QuizStore};

/// Fetches the next random question for `cookie`, returning the JSON body.
async fn play(client: &reqwest::Client, app: &TestApp, cookie: &str) -> serde_json::Value {
    client
        .get(&format!("{}/api/random/play", app.address))
        .header("Cookie", cookie)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse play json")
}

async fn check(
    client: &reqwest::Client,
    app: &TestApp,
    cookie: &str,
    id: i64,
    answer: &str,
) -> reqwest::Response {
    client
        .get(&format!("{}/api/random/check/{}", app.address, id))
        .query(&[("answer", answer)])
        .header("Cookie", cookie)
        .send()
        .await
        .expect("Failed to execute request")
}

/// Starts a session and returns its cookie together with the first question.
async fn start(client: &reqwest::Client, app: &TestApp) -> (String, serde_json::Value) {
    let response = client
        .get(&format!("{}/api/random/play", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let cookie = session_cookie(&response).expect("Session cookie not set");
    assert!(cookie.starts_with("quiz_session="));
    let body = response.json().await.unwrap();
    (cookie, body)
}

#[tokio::test]
async fn random_play_runs_until_exhausted() {
    // Arrange
    let app = spawn_app(InMemoryQuizStore::with_quizzes([
        ("2+2", "4"),
        ("capital of France", "Paris"),
    ]))
    .await;
    let client = reqwest::Client::new();

    // Act & Assert
    let (cookie, mut next) = start(&client, &app).await;
    let mut seen = HashSet::new();

    for expected_score in 1..=2 {
        assert_eq!(next["status"], "next_question");
        assert_eq!(next["score"], expected_score - 1);
        let id = next["quiz"]["id"].as_i64().unwrap();
        assert!(seen.insert(id), "quiz {} shown twice", id);

        let answer = app.quizzes.get(id).await.unwrap().answer;
        let result: serde_json::Value = check(&client, &app, &cookie, id, &format!("  {} ", answer.to_uppercase()))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"status": "correct", "score": expected_score}));

        next = play(&client, &app, &cookie).await;
    }

    assert_eq!(
        next,
        serde_json::json!({"status": "terminated", "final_score": 2, "reason": "exhausted"})
    );
    assert!(app.sessions.is_empty().unwrap());
}

#[tokio::test]
async fn reload_returns_same_question() {
    let app = spawn_app(InMemoryQuizStore::with_quizzes([
        ("a", "1"),
        ("b", "2"),
        ("c", "3"),
    ]))
    .await;
    let client = reqwest::Client::new();

    let (cookie, first) = start(&client, &app).await;
    for _ in 0..3 {
        assert_eq!(play(&client, &app, &cookie).await, first);
    }
}

#[tokio::test]
async fn wrong_answer_ends_run() {
    let app = spawn_app(InMemoryQuizStore::with_quizzes([
        ("a", "1"),
        ("b", "2"),
        ("c", "3"),
    ]))
    .await;
    let client = reqwest::Client::new();

    let (cookie, first) = start(&client, &app).await;
    let id = first["quiz"]["id"].as_i64().unwrap();
    let answer = app.quizzes.get(id).await.unwrap().answer;
    check(&client, &app, &cookie, id, &answer).await;

    let second = play(&client, &app, &cookie).await;
    let id = second["quiz"]["id"].as_i64().unwrap();
    let result: serde_json::Value = check(&client, &app, &cookie, id, "definitely wrong")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(
        result,
        serde_json::json!({"status": "terminated", "final_score": 1, "reason": "wrong_answer"})
    );
    assert!(app.sessions.is_empty().unwrap());

    // The same cookie starts over from zero.
    let restarted = play(&client, &app, &cookie).await;
    assert_eq!(restarted["status"], "next_question");
    assert_eq!(restarted["score"], 0);
}

#[tokio::test]
async fn check_without_active_question_conflicts() {
    let app = spawn_app(InMemoryQuizStore::with_quizzes([("a", "1"), ("b", "2")])).await;
    let client = reqwest::Client::new();

    // No cookie at all: a fresh session has nothing pending.
    let response = client
        .get(&format!("{}/api/random/check/1?answer=1", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    // Answering a quiz other than the pending one.
    let (cookie, first) = start(&client, &app).await;
    let pending = first["quiz"]["id"].as_i64().unwrap();
    let other = if pending == 1 { 2 } else { 1 };
    let response = check(&client, &app, &cookie, other, "1").await;
    assert_eq!(response.status().as_u16(), 409);

    // The pending question survives the rejected submission.
    assert_eq!(play(&client, &app, &cookie).await, first);
}

#[tokio::test]
async fn tampered_cookie_gets_new_session() {
    let app = spawn_app(InMemoryQuizStore::with_quizzes([("a", "1")])).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/random/play", app.address))
        .header("Cookie", "quiz_session=not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn empty_catalog_is_exhausted_immediately() {
    let app = spawn_app(InMemoryQuizStore::new()).await;
    let client = reqwest::Client::new();

    let (_, body) = start(&client, &app).await;
    assert_eq!(
        body,
        serde_json::json!({"status": "terminated", "final_score": 0, "reason": "exhausted"})
    );
    assert!(app.sessions.is_empty().unwrap());
}
