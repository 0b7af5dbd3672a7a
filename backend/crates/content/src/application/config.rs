//! Application Configuration
//!
//! Configuration for the content application layer.

use std::path::PathBuf;

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Content application configuration
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    /// Largest accepted image file
    pub max_upload_bytes: usize,
    /// Public URL prefix the upload directory is served under
    pub upload_url_prefix: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("static/uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_url_prefix: "/uploads".to_string(),
        }
    }
}

impl ContentConfig {
    pub fn with_upload_dir(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Default::default()
        }
    }

    /// Request body limit: the largest image plus room for the text fields
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(64 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContentConfig::default();
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.upload_dir, PathBuf::from("static/uploads"));
        assert!(config.body_limit() > config.max_upload_bytes);
    }
}
