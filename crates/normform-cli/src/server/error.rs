//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the normform library.
    Normalize(normform::NormalizeError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Normalize(e) if e.is_input_error() => {
                (StatusCode::BAD_REQUEST, "invalid_input", e.to_string())
            }
            ApiError::Normalize(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "normalize_error", e.to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(%message, "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<normform::NormalizeError> for ApiError {
    fn from(err: normform::NormalizeError) -> Self {
        ApiError::Normalize(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Normalize(e) => write!(f, "Normalization error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
