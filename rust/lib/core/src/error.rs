use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Stable error code constants.
///
/// The board matches on `code` from `{"code": "NOT_FOUND", "message": "..."}`
/// and shows `message` to the user as-is.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INTERNAL: &str = "INTERNAL";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Error type shared by every collection of the tracker.
///
/// Only three outcomes matter to callers: the record is missing, the input
/// was rejected, or the server failed. Conflicts exist for id collisions in
/// the store layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// An id is already taken. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Missing required field, unparseable label or date. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Document store failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// `order 'abc' not found`
    pub fn not_found(kind: &str, id: &str) -> Self {
        ServiceError::NotFound(format!("{} '{}' not found", kind, id))
    }

    /// `customer is required`
    pub fn required(field: &str) -> Self {
        ServiceError::Validation(format!("{} is required", field))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, axum::Json(self.body())).into_response()
    }
}
