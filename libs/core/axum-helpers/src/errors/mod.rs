pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DatabaseError;
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1005,
///   "error": "CONFLICT",
///   "message": "restaurant with slug 'joes-diner' already exists"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details, e.g. validation field errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP-facing error. Domain errors convert into this at the handler boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query string error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Path error: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Multipart error: {0}")]
    MultipartRejection(#[from] MultipartRejection),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Postgres(e) => AppError::Database(e),
            DatabaseError::UniqueViolation(detail) => AppError::Conflict(detail),
            DatabaseError::InvalidQuery(message) => AppError::InvalidQuery(message),
            DatabaseError::ConnectionFailed(message) | DatabaseError::HealthCheckFailed(message) => {
                AppError::ServiceUnavailable(message)
            }
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

type ErrorParts = (StatusCode, String, Option<serde_json::Value>, ErrorCode);

impl AppError {
    fn into_parts(self) -> ErrorParts {
        let plain = |status: StatusCode, code: ErrorCode| {
            (status, code.default_message().to_string(), None, code)
        };

        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), error = ?e, "JSON serialization error");
                plain(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::SerdeJsonError)
            }
            AppError::Database(e) => map_db_error(&e),
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), error = ?e, "I/O error");
                plain(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::IoError)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), error = %e, "JSON extraction error");
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::QueryRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidQuery.code(), error = %e, "Query string rejected");
                (e.status(), e.body_text(), None, ErrorCode::InvalidQuery)
            }
            AppError::PathRejection(e) => {
                tracing::warn!(error_code = ErrorCode::BadRequest.code(), error = %e, "Path rejected");
                (e.status(), e.body_text(), None, ErrorCode::BadRequest)
            }
            AppError::MultipartRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUpload.code(), error = %e, "Multipart request rejected");
                (e.status(), e.body_text(), None, ErrorCode::InvalidUpload)
            }
            AppError::Multipart(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUpload.code(), error = %e, "Multipart body unreadable");
                (e.status(), e.body_text(), None, ErrorCode::InvalidUpload)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), error = ?e, "Validation error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), error = %e, "UUID error");
                plain(StatusCode::BAD_REQUEST, ErrorCode::InvalidUuid)
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::InvalidQuery(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidQuery.code(), "Invalid query: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidQuery)
            }
            AppError::InvalidUpload(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidUpload.code(), "Invalid upload: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidUpload)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict)
            }
            AppError::RequestTimeout => {
                tracing::warn!(error_code = ErrorCode::RequestTimeout.code(), "Request timed out");
                plain(StatusCode::REQUEST_TIMEOUT, ErrorCode::RequestTimeout)
            }
            AppError::Storage(msg) => {
                tracing::error!(error_code = ErrorCode::StorageError.code(), "Storage error: {}", msg);
                plain(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageError)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                plain(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = ErrorCode::ServiceUnavailable.code(), "Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg, None, ErrorCode::ServiceUnavailable)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = self.into_parts();
        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Internal details of database failures are logged, never returned.
fn map_db_error(error: &DbErr) -> ErrorParts {
    let (status, code) = match error {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseUnavailable)
        }
        DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    };

    if status.is_server_error() {
        tracing::error!(error_code = code.code(), error = ?error, "Database error");
    } else {
        tracing::info!(error_code = code.code(), error = %error, "Database record not found");
    }

    (status, code.default_message().to_string(), None, code)
}

/// Error response from a bare status, message and code.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_conflict_is_409() {
        let (status, body) = body_of(AppError::Conflict("slug taken".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, 1005);
        assert_eq!(body.error, "CONFLICT");
        assert_eq!(body.message, "slug taken");
    }

    #[tokio::test]
    async fn test_internal_messages_are_not_leaked() {
        let (status, body) =
            body_of(AppError::InternalServerError("pool exploded at 0xdead".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, ErrorCode::InternalError.default_message());

        let (status, body) = body_of(AppError::Database(DbErr::Custom("secret".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "DATABASE_ERROR");
        assert!(!body.message.contains("secret"));
    }

    #[tokio::test]
    async fn test_database_error_conversion() {
        let (status, body) = body_of(DatabaseError::invalid_query("unknown field 'x'").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "INVALID_QUERY");
        assert_eq!(body.message, "unknown field 'x'");

        let (status, _) = body_of(DatabaseError::UniqueViolation("dup".into()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_timeout_is_408() {
        let (status, body) = body_of(AppError::RequestTimeout).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.code, ErrorCode::RequestTimeout.code());
    }

    #[tokio::test]
    async fn test_validation_error_carries_details() {
        use validator::Validate;

        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 1))]
            name: String,
        }

        let err = Input {
            name: String::new(),
        }
        .validate()
        .unwrap_err();
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.details.unwrap().get("name").is_some());
    }
}
