//! Uploaded file handed over by the presentation layer

use platform::storage::sanitize_file_name;
use uuid::Uuid;

use crate::error::{ClinicError, ClinicResult};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name on the client machine, unsanitized
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Reject empty files and files over `limit`
    pub fn check_size(&self, limit: usize) -> ClinicResult<()> {
        if self.bytes.is_empty() {
            return Err(ClinicError::invalid("file", "The uploaded file is empty"));
        }
        if self.bytes.len() > limit {
            return Err(ClinicError::PayloadTooLarge { limit_bytes: limit });
        }
        Ok(())
    }

    pub fn sanitized_name(&self) -> String {
        sanitize_file_name(&self.file_name)
    }

    /// `<dir>/<8 hex chars>_<sanitized name>`, unique per upload
    pub fn stored_path(&self, dir: &str) -> String {
        let prefix = Uuid::new_v4().simple().to_string();
        format!("{}/{}_{}", dir, &prefix[..8], self.sanitized_name())
    }

    pub fn extension(&self) -> Option<String> {
        let name = self.sanitized_name();
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }
}
