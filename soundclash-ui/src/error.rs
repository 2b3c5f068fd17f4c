//! HTTP error mapping for soundclash-ui
//!
//! The core classifies outcomes; this layer only maps them to status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::scanner::ScanError;
use soundclash_common::Error as CoreError;

/// Result type for request handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Request handler errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Store or ranking pipeline failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Battles directory scan failure
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Voting endpoints while the battle is closed
    #[error("voting is closed")]
    VotingClosed,

    /// Results endpoint while voting is still open
    #[error("cannot view results while voting is open")]
    ResultsNotAvailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::InvalidScore(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(_) | ApiError::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::VotingClosed | ApiError::ResultsNotAvailable => StatusCode::CONFLICT,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self}");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ApiError::Core(CoreError::BattleNotFound("x".into()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::EntryNotFound(Uuid::now_v7()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::InvalidScore(4))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::VotingClosed), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ApiError::Core(CoreError::Config("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
