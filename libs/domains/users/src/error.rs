use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ErrorCode, ErrorResponse};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User '{0}' not found")]
    NotFound(String),

    /// Malformed body or patch
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Field rules failed; rendered with per-field details
    #[error("Invalid input: {0}")]
    InvalidFields(#[from] ValidationErrors),

    /// Body could not be decoded as JSON of the expected shape
    #[error("Malformed body: {0}")]
    Body(#[from] JsonRejection),

    #[error("User '{0}' already exists")]
    Conflict(String),

    /// Connection or driver failure
    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        UserError::Store(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Same bodies as the shared extractors produce on POST
            UserError::InvalidFields(errors) => return AppError::from(errors).into_response(),
            UserError::Body(rejection) => return AppError::from(rejection).into_response(),
            UserError::NotFound(id) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), user_id = %id, "User not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(ErrorCode::NotFound, format!("User '{}' not found", id)),
                )
            }
            UserError::Validation(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Invalid request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(ErrorCode::ValidationError, msg),
                )
            }
            UserError::Conflict(id) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), user_id = %id, "Duplicate user id");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(ErrorCode::Conflict, format!("User '{}' already exists", id)),
                )
            }
            UserError::Store(msg) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        ErrorCode::DatabaseError,
                        ErrorCode::DatabaseError.default_message(),
                    ),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        ErrorCode::InternalError,
                        ErrorCode::InternalError.default_message(),
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (UserError::NotFound("u1".into()), StatusCode::NOT_FOUND),
            (UserError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (UserError::Conflict("u1".into()), StatusCode::CONFLICT),
            (UserError::Store("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (UserError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_db_err_becomes_store() {
        let err: UserError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, UserError::Store(msg) if msg.contains("connection reset")));
    }
}
