//! Error codes carried by every [`super::ErrorResponse`].
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer for
//! logs and dashboards, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::Conflict;
//! assert_eq!(code.as_str(), "CONFLICT");
//! assert_eq!(code.code(), 1005);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    /// Duplicate slug, tax id or scoped name
    Conflict,
    /// Unknown filter/sort field or a badly typed query value
    InvalidQuery,
    /// Missing file, wrong content type or oversized upload
    InvalidUpload,
    RequestTimeout,
    MethodNotAllowed,
    BadRequest,

    // Database errors (2000s)
    DatabaseError,
    DatabaseUnavailable,

    // Block storage errors (3000s)
    StorageError,

    // I/O errors (4000s)
    IoError,

    // Server errors (5000s)
    SerdeJsonError,
    InternalError,
    ServiceUnavailable,
    Panic,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidUpload => "INVALID_UPLOAD",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::BadRequest => "BAD_REQUEST",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::StorageError => "STORAGE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Panic => "PANIC",
        }
    }

    /// Integer code for structured logs: 1xxx client, 2xxx database,
    /// 3xxx storage, 4xxx I/O, 5xxx server.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Conflict => 1005,
            Self::InvalidQuery => 1006,
            Self::InvalidUpload => 1007,
            Self::RequestTimeout => 1008,
            Self::MethodNotAllowed => 1009,
            Self::BadRequest => 1010,

            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,

            Self::StorageError => 3001,

            Self::IoError => 4001,

            Self::SerdeJsonError => 5001,
            Self::InternalError => 5002,
            Self::ServiceUnavailable => 5003,
            Self::Panic => 5004,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::InvalidQuery => "Invalid query parameters",
            Self::InvalidUpload => "Invalid file upload",
            Self::RequestTimeout => "Request took too long to complete",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::BadRequest => "Bad request",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is temporarily unavailable",
            Self::StorageError => "File storage error occurred",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::Panic => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
