//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies handler failures into a single enum that
//! converts into an Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use feedmock_core::FeedError;

/// Errors that can occur in the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client asked for a failure (`?fail=true` on the echo
    /// endpoint). Answered with a bare 500 so clients can exercise their
    /// error paths.
    #[error("client requested failure")]
    ClientRequestedFailure,

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Generating or sampling data failed.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::ClientRequestedFailure => {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Feed(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
