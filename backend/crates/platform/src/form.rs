//! Request body → [`FormSubmission`]
//!
//! Accepts both `application/x-www-form-urlencoded` and `multipart/form-data`
//! so forms with and without file inputs go through the same path.

use axum::Form;
use axum::extract::{FromRequest, Multipart, Request};
use axum::extract::multipart::MultipartError;
use axum::http::header;
use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use kernel::validation::{FieldErrors, FormSubmission, UploadedFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormReadError {
    /// An uploaded file exceeded the configured limit
    #[error("File in `{field}` is larger than {max_bytes} bytes")]
    FileTooLarge { field: String, max_bytes: usize },

    #[error("Malformed form body: {0}")]
    Malformed(String),

    #[error("Unsupported form encoding")]
    UnsupportedEncoding,
}

impl FormReadError {
    /// Field-level error for re-rendering the form, when the failure is
    /// attributable to one field
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            FormReadError::FileTooLarge { field, max_bytes } => Some(FieldErrors::single(
                field.clone(),
                format!("File cannot be larger than {}.", human_size(*max_bytes)),
            )),
            _ => None,
        }
    }
}

impl From<MultipartError> for FormReadError {
    fn from(err: MultipartError) -> Self {
        FormReadError::Malformed(err.body_text())
    }
}

impl From<FormReadError> for AppError {
    fn from(err: FormReadError) -> Self {
        match &err {
            FormReadError::FileTooLarge { .. } => {
                AppError::new(ErrorKind::PayloadTooLarge, "Uploaded file is too large")
            }
            FormReadError::Malformed(_) => AppError::bad_request("Malformed form body"),
            FormReadError::UnsupportedEncoding => {
                AppError::new(ErrorKind::UnsupportedMediaType, "Unsupported form encoding")
            }
        }
        .with_source(err)
    }
}

/// Read the whole form body
///
/// Files larger than `max_file_bytes` stop reading with
/// [`FormReadError::FileTooLarge`].
pub async fn read_form(request: Request, max_file_bytes: usize) -> Result<FormSubmission, FormReadError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| FormReadError::Malformed(e.body_text()))?;
        read_multipart(multipart, max_file_bytes).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|e| FormReadError::Malformed(e.body_text()))?;
        Ok(FormSubmission::from_pairs(pairs))
    } else {
        Err(FormReadError::UnsupportedEncoding)
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<FormSubmission, FormReadError> {
    let mut submission = FormSubmission::new();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await?;
            submission.insert_field(name, value);
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if bytes.len().saturating_add(chunk.len()) > max_file_bytes {
                return Err(FormReadError::FileTooLarge {
                    field: name,
                    max_bytes: max_file_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        submission.insert_file(
            name,
            UploadedFile {
                file_name,
                content_type,
                bytes,
            },
        );
    }

    Ok(submission)
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MiB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{} KiB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
