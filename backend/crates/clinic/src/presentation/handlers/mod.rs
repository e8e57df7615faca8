//! HTTP Handlers
//!
//! Handlers take the [`CurrentUser`](auth::CurrentUser) resolved by the
//! session middleware and hand it to the use cases, which enforce the role
//! gates.

pub mod checklists;
pub mod divisions;
pub mod injuries;
pub mod matches;
pub mod medical_files;
pub mod players;
pub mod treatments;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::storage::FileStore;

use crate::application::config::ClinicConfig;
use crate::application::players::FileContent;
use crate::application::upload::UploadedFile;
use crate::domain::repository::ClinicStore;
use crate::error::{ClinicError, ClinicResult};
use crate::presentation::dto::ChoicesResponse;

/// Shared state for clinic handlers
#[derive(Clone)]
pub struct ClinicAppState<R: ClinicStore> {
    pub repo: Arc<R>,
    pub files: FileStore,
    pub config: Arc<ClinicConfig>,
}

/// GET /api/choices
pub async fn choices() -> Json<ChoicesResponse> {
    Json(ChoicesResponse::all())
}

/// Text fields plus at most one file of a multipart form
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Drain the form; the file part is the one named `file_field`
    pub async fn read(
        mut multipart: Multipart,
        file_field: &'static str,
        config: &ClinicConfig,
    ) -> ClinicResult<Self> {
        let mut form = Self::default();
        let reject = |e: MultipartError| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ClinicError::PayloadTooLarge {
                    limit_bytes: config.multipart_body_limit(),
                }
            } else {
                ClinicError::invalid(file_field, e.body_text())
            }
        };

        while let Some(field) = multipart.next_field().await.map_err(reject)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(reject)?;
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(reject)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self, file_field: &'static str) -> ClinicResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| ClinicError::invalid(file_field, "A file is required"))
    }

    /// Non-blank text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Inline download of stored bytes
pub(crate) fn file_response(content: FileContent) -> Response {
    (
        [
            (header::CONTENT_TYPE, content.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", content.file_name),
            ),
        ],
        content.bytes,
    )
        .into_response()
}
