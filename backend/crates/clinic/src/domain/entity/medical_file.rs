//! Medical File Entity
//!
//! An uploaded attachment (X-ray, MRI, specialist report) of a player. The
//! bytes live in the file store; this record keeps the relative path.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, MedicalFileId, PlayerId};
use std::path::Path;

use crate::domain::choices::FileKind;

#[derive(Debug, Clone)]
pub struct MedicalFile {
    pub file_id: MedicalFileId,
    pub player_id: PlayerId,
    pub kind: FileKind,
    pub title: String,
    pub document_date: NaiveDate,
    /// Relative to the media root
    pub stored_path: String,
    /// Name the file had on the uploader's machine (sanitized)
    pub original_name: String,
    pub size_bytes: i64,
    pub notes: Option<String>,
    pub uploaded_by: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl MedicalFile {
    pub fn content_type(&self) -> &'static str {
        content_type_for(&self.stored_path)
    }
}

/// MIME type guessed from the file extension
pub fn content_type_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "dcm" => "application/dicom",
        "txt" => "text/plain; charset=utf-8",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
