// src/utils/session_token.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, SESSION_COOKIE_NAME},
    error::AppError,
};

/// Identifies the browser a random-play session belongs to.
/// Injected into request extensions by `session_middleware`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerKey(pub String);

/// Claims carried by the session cookie.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionClaims {
    /// Subject - the player key.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a session token for `key`, valid for `ttl_seconds`.
pub fn sign_session_token(key: &str, secret: &str, ttl_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + ttl_seconds as usize;

    let claims = SessionClaims {
        sub: key.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
///
/// Returns the `SessionClaims` if valid, otherwise returns an `AppError`.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::BadRequest("Invalid session token".to_string()))?;

    Ok(token_data.claims)
}

/// Finds cookie `name` across all `Cookie` headers.
fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Axum Middleware: Player session.
///
/// Reads the signed `quiz_session` cookie and injects its `PlayerKey`.
/// A missing, expired or tampered cookie gets a fresh key and the response
/// carries a `Set-Cookie` for it.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let existing = cookie_value(req.headers(), SESSION_COOKIE_NAME)
        .and_then(|token| verify_session_token(token, &config.session_secret).ok())
        .map(|claims| claims.sub);

    let (key, issued) = match existing {
        Some(key) => (key, None),
        None => {
            let key = uuid::Uuid::new_v4().to_string();
            let token = sign_session_token(&key, &config.session_secret, config.session_ttl_seconds)?;
            tracing::debug!("Issuing new play session");
            (key, Some(token))
        }
    };

    req.extensions_mut().insert(PlayerKey(key));
    let mut response = next.run(req).await;

    if let Some(token) = issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE_NAME, token, config.session_ttl_seconds
        );
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    Ok(response)
}
