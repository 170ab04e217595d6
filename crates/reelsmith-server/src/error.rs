//! Error types for the server.
//!
//! Validation failures carry the full field-level error list so a caller can
//! fix every problem in one round trip; they are the only 400 with structure.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use reelsmith_types::FieldError;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The run configuration failed validation.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Bad request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reelsmith_config::ConfigError> for ServerError {
    fn from(e: reelsmith_config::ConfigError) -> Self {
        ServerError::BadRequest(e.to_string())
    }
}

/// Error response body for unstructured failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Error response body for validation failures.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub code: String,
    pub errors: Vec<FieldError>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Validation(errors) => {
                tracing::warn!(fields = errors.len(), "request rejected by validation");
                let body = ValidationResponse {
                    code: "validation_failed".to_string(),
                    errors,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => {
                let (status, code) = match &other {
                    ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
                    ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
                    ServerError::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                    ServerError::Validation(_) => unreachable!(),
                };
                let message = other.to_string();

                if status.is_server_error() {
                    tracing::error!(status = %status, code, error = %message, "server error");
                } else {
                    tracing::warn!(status = %status, code, error = %message, "client error");
                }

                let body = ErrorResponse {
                    code: code.to_string(),
                    message,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_shape() {
        let body = ValidationResponse {
            code: "validation_failed".to_string(),
            errors: vec![FieldError {
                field: "topic".to_string(),
                message: "must not be empty".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "validation_failed");
        assert_eq!(json["errors"][0]["field"], "topic");
    }
}
