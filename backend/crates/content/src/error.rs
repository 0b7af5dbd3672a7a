//! Content Error Types
//!
//! This module provides content-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use platform::form::FormReadError;
use thiserror::Error;

/// Content-specific result type alias
pub type ContentResult<T> = Result<T, ContentError>;

/// Content-specific error variants
#[derive(Debug, Error)]
pub enum ContentError {
    /// No record with this id
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Create without an uploaded image
    #[error("An image is required")]
    ImageRequired,

    /// Uploaded bytes are not a jpg or png image
    #[error("Only jpg, jpeg and png images are allowed.")]
    UnsupportedImage,

    /// Form input rejected
    #[error("Invalid form input")]
    Validation(FieldErrors),

    /// Request body could not be read as a form
    #[error(transparent)]
    Form(#[from] FormReadError),

    /// Image file could not be written, read or resolved
    #[error("Image storage failed ({op}): {source}")]
    StorageIo {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContentError {
    pub fn not_found<E: crate::domain::Entity>(id: crate::domain::EntityId<E>) -> Self {
        ContentError::NotFound {
            entity: E::KIND.label(),
            id: id.get(),
        }
    }

    pub(crate) fn storage(op: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| ContentError::StorageIo { op, source }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::NotFound { .. } => ErrorKind::NotFound,
            ContentError::ImageRequired
            | ContentError::UnsupportedImage
            | ContentError::Validation(_) => ErrorKind::UnprocessableEntity,
            ContentError::Form(FormReadError::FileTooLarge { .. }) => ErrorKind::PayloadTooLarge,
            ContentError::Form(FormReadError::UnsupportedEncoding) => {
                ErrorKind::UnsupportedMediaType
            }
            ContentError::Form(FormReadError::Malformed(_)) => ErrorKind::BadRequest,
            ContentError::StorageIo { .. }
            | ContentError::Database(_)
            | ContentError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show on a page or in a flash
    pub fn user_message(&self) -> String {
        match self {
            ContentError::NotFound { .. } => "The requested page does not exist.".to_string(),
            ContentError::StorageIo { .. } => {
                "The image could not be stored. Please try again.".to_string()
            }
            ContentError::Database(_) | ContentError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Field errors for re-rendering a form, when the failure has any
    pub fn field_errors(&self, image_field: &str) -> Option<FieldErrors> {
        match self {
            ContentError::Validation(fields) => Some(fields.clone()),
            ContentError::ImageRequired => Some(FieldErrors::single(image_field, "File is required.")),
            ContentError::UnsupportedImage => Some(FieldErrors::single(image_field, self.to_string())),
            ContentError::Form(e) => e.field_errors(),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            ContentError::Validation(fields) => AppError::validation(fields.clone()),
            _ => AppError::new(self.kind(), self.user_message()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ContentError::Database(e) => {
                tracing::error!(error = %e, "Content database error");
            }
            ContentError::Internal(msg) => {
                tracing::error!(message = %msg, "Content internal error");
            }
            ContentError::StorageIo { op, source } => {
                tracing::error!(op = *op, error = %source, "Image storage error");
            }
            ContentError::Form(e) => {
                tracing::warn!(error = %e, "Unreadable content form");
            }
            _ => {
                tracing::debug!(error = %self, "Content error");
            }
        }
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Team};

    #[test]
    fn test_status_codes() {
        let id: EntityId<Team> = EntityId::new(4);
        assert_eq!(ContentError::not_found(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ContentError::ImageRequired.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ContentError::Form(FormReadError::FileTooLarge {
                field: "img".into(),
                max_bytes: 10
            })
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ContentError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_names_entity() {
        let id: EntityId<Team> = EntityId::new(4);
        assert_eq!(ContentError::not_found(id).to_string(), "Team 4 not found");
    }

    #[test]
    fn test_storage_details_not_exposed() {
        let err = ContentError::storage("write image")(std::io::Error::other("/srv/secret/path"));
        assert!(!err.user_message().contains("/srv"));
        assert!(!err.to_app_error().message().contains("/srv"));
    }

    #[test]
    fn test_image_errors_map_to_field() {
        let errors = ContentError::ImageRequired.field_errors("img").unwrap();
        assert_eq!(errors.get("img"), Some(&["File is required.".to_string()][..]));
        assert!(ContentError::Internal("x".into()).field_errors("img").is_none());
    }
}
