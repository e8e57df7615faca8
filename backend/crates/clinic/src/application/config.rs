//! Application Configuration
//!
//! Configuration for the Clinic application layer.

use std::path::PathBuf;

use kernel::rut::RutValidator;

use crate::domain::entity::matches::MAX_CALL_UPS;

#[derive(Debug, Clone)]
pub struct ClinicConfig {
    /// Root directory of uploaded files
    pub media_root: PathBuf,
    /// Largest accepted medical attachment
    pub max_upload_bytes: usize,
    /// Largest accepted profile photo
    pub max_photo_bytes: usize,
    pub max_call_ups: usize,
    /// RUT validation host, shared with auth
    pub rut: RutValidator,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("media"),
            max_upload_bytes: 20 * 1024 * 1024,
            max_photo_bytes: 5 * 1024 * 1024,
            max_call_ups: MAX_CALL_UPS,
            rut: RutValidator::default(),
        }
    }
}

impl ClinicConfig {
    /// Create config for development (media under the working directory)
    pub fn development() -> Self {
        Self {
            media_root: PathBuf::from("./media"),
            ..Default::default()
        }
    }

    /// Body limit for multipart routes: the file plus form fields
    pub fn multipart_body_limit(&self) -> usize {
        self.max_upload_bytes.max(self.max_photo_bytes) + 64 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::default();
        assert_eq!(config.max_call_ups, 22);
        assert!(config.multipart_body_limit() > config.max_upload_bytes);
        assert!(!config.rut.config().strict);
    }
}
