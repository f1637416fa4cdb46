use axum::{http::StatusCode, response::Response};
use std::any::Any;

use super::{ErrorCode, error_response};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found".to_string(),
        ErrorCode::NotFound,
    )
}

pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message().to_string(),
        ErrorCode::MethodNotAllowed,
    )
}

/// Response for `tower_http::catch_panic::CatchPanicLayer::custom`.
///
/// The panic payload is logged; clients only get the generic 500 body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(error_code = ErrorCode::Panic.code(), panic = detail, "Handler panicked");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::Panic.default_message().to_string(),
        ErrorCode::Panic,
    )
}
