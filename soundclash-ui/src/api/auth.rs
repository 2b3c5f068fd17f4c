//! Bearer-token authentication for administrative endpoints
//!
//! Fails closed: an unset API key rejects every request rather than
//! letting admin calls through unauthenticated.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{error, warn};

use crate::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if state.api_key.is_empty() {
        error!("api key not set, rejecting admin request");
        return Err(AuthError::KeyNotConfigured);
    }

    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    let token = header.strip_prefix("Bearer ").ok_or(AuthError::MalformedHeader)?;

    if !token_matches(token, &state.api_key) {
        warn!("admin request with invalid bearer token");
        return Err(AuthError::InvalidToken);
    }

    Ok(next.run(request).await)
}

/// Constant-time token comparison.
///
/// Both sides are hashed to fixed length first, so neither content nor
/// length differences shift the comparison time.
fn token_matches(provided: &str, expected: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Authentication failures, all mapped to 401
#[derive(Debug)]
pub enum AuthError {
    KeyNotConfigured,
    MissingHeader,
    MalformedHeader,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::KeyNotConfigured => "authentication is not configured",
            AuthError::MissingHeader => "missing Authorization header",
            AuthError::MalformedHeader => "expected Bearer authorization",
            AuthError::InvalidToken => "invalid token",
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matching() {
        assert!(token_matches("secret", "secret"));
        assert!(!token_matches("secret", "other"));
        assert!(!token_matches("", "secret"));
        assert!(!token_matches("secretsecret", "secret"));
    }
}
