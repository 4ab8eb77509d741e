//! Response envelope shared by the backend and the API client
//!
//! Every backend response has the shape `{ success, data?, error? }`.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorKind};

/// Uniform result envelope.
///
/// `kind` is local metadata for callers of the API client and is never put
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
        }
    }

    /// Failed envelope built from an error.
    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.message().to_string()),
            kind: Some(err.kind()),
        }
    }

    /// Attaches fallback data to a failed envelope.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// True when the envelope failed because the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind == Some(ErrorKind::NotFound)
    }

    /// Error text, or a generic message for a failed envelope without one.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Request failed")
    }

    /// Converts back to a `Result`. A success without data is treated as an
    /// error.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ApiError::transport("Response is missing data")),
            (false, _) => {
                let message = self.error.unwrap_or_else(|| "Request failed".to_string());
                Err(match self.kind {
                    Some(ErrorKind::Validation) => ApiError::Validation(message),
                    Some(ErrorKind::NotFound) => ApiError::NotFound(message),
                    _ => ApiError::Transport(message),
                })
            }
        }
    }
}

impl ApiResponse<()> {
    /// Successful envelope for endpoints that return no data.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            kind: None,
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResponse<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(err) => ApiResponse::failure(&err),
        }
    }
}
