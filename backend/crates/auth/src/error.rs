//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shown for any failed login, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    /// Unique email constraint violated
    #[error("A user with this email already exists.")]
    EmailTaken,

    /// Unknown email or wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Session missing, tampered with or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Form input rejected
    #[error("Invalid form input")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::Validation(_) => ErrorKind::UnprocessableEntity,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(fields) => AppError::validation(fields.clone()),
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "Something went wrong. Please try again.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::EmailTaken => {
                tracing::warn!("Registration with an existing email");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Conflict => AuthError::EmailTaken,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

/// `true` for a PostgreSQL unique-constraint violation (SQLSTATE 23505)
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Validation(FieldErrors::default()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let app = AuthError::Internal("pool exploded".into()).to_app_error();
        assert!(!app.message().contains("pool"));
    }

    #[test]
    fn test_generic_login_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn test_validation_keeps_fields() {
        let err = AuthError::Validation(FieldErrors::single("email", "Invalid email address."));
        let app = err.to_app_error();
        assert!(app.fields().and_then(|f| f.get("email")).is_some());
    }
}
