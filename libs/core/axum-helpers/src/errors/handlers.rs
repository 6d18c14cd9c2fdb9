use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Router fallback for unknown routes.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
        ErrorCode::NotFound,
    )
}

/// Fallback for a known route hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message(),
        ErrorCode::MethodNotAllowed,
    )
}
