//! Error types for the inventory client
//!
//! Provides unified error handling using thiserror. The same taxonomy is
//! used by the data sources, the API client and the dev backend.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for backend interaction.
///
/// The `Display` output is the bare message so it can be shown to the user
/// as-is (e.g. `"Barcode is required"`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or invalid input, detected before or by the backend
    #[error("{0}")]
    Validation(String),

    /// The requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Network failure, timeout, server error or malformed response
    #[error("{0}")]
    Transport(String),
}

// == Error Kind ==
/// Payload-free discriminant of [`ApiError`], carried alongside envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
}

impl ApiError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Transport(msg) => msg,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ApiError::Transport(msg.into())
    }
}

// == Conversions ==
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if err.is_decode() {
            ApiError::Transport(format!("Invalid response: {}", err))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Transport(format!("Invalid response: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.message(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for backend interaction.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = ApiError::validation("Barcode is required");
        assert_eq!(err.to_string(), "Barcode is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_json_error_maps_to_transport() {
        let err: ApiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.message().starts_with("Invalid response"));
    }

    #[test]
    fn test_into_response_status() {
        assert_eq!(
            ApiError::not_found("Item not found").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("bad").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::transport("down").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
