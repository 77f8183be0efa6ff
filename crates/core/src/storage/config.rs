//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use zeno_shared::UploadConfig;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL. `None` uses the AWS default.
        endpoint: Option<String>,
        /// S3 bucket name.
        bucket: String,
        /// Key prefix inside the bucket.
        prefix: String,
        /// AWS access key ID.
        access_key_id: Option<String>,
        /// AWS secret access key.
        secret_access_key: Option<String>,
        /// AWS region.
        region: String,
    },
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed lowercase file extensions, without the dot.
    pub allowed_extensions: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 5MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Create a new storage config accepting PDFs up to the default size.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: vec!["pdf".to_string()],
        }
    }

    /// Builds the config from the `uploads` section.
    ///
    /// A configured S3 bucket wins over the local directory, and the
    /// directory is then used as key prefix inside the bucket.
    #[must_use]
    pub fn from_upload_config(uploads: &UploadConfig) -> Self {
        let provider = match uploads.s3_bucket() {
            Some(bucket) => StorageProvider::S3 {
                endpoint: uploads.s3_endpoint.clone(),
                bucket: bucket.to_string(),
                prefix: uploads.root.to_string_lossy().into_owned(),
                access_key_id: uploads.s3_access_key_id.clone(),
                secret_access_key: uploads.s3_secret_access_key.clone(),
                region: uploads.s3_region.clone(),
            },
            None => StorageProvider::local_fs(uploads.root.clone()),
        };
        Self::new(provider).with_max_file_size(uploads.max_file_size)
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Check the extension after the last dot, case-insensitively.
    #[must_use]
    pub fn is_extension_allowed(&self, filename: &str) -> bool {
        filename.rsplit_once('.').is_some_and(|(_, ext)| {
            self.allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_local() {
        let provider = StorageProvider::local_fs("./storage");
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.max_file_size, StorageConfig::DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.allowed_extensions, vec!["pdf".to_string()]);
    }

    #[test]
    fn test_extension_validation() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert!(config.is_extension_allowed("cv.pdf"));
        assert!(config.is_extension_allowed("CV.PDF"));
        assert!(config.is_extension_allowed("my.cv.v2.pdf"));
        assert!(!config.is_extension_allowed("cv.docx"));
        assert!(!config.is_extension_allowed("cv.pdf.exe"));
        assert!(!config.is_extension_allowed("pdf"));
        assert!(!config.is_extension_allowed(""));
    }

    #[test]
    fn test_from_upload_config_local() {
        let uploads = UploadConfig {
            max_file_size: 1024,
            ..UploadConfig::default()
        };
        let config = StorageConfig::from_upload_config(&uploads);
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_from_upload_config_s3() {
        let uploads = UploadConfig {
            s3_bucket: Some("cvs".to_string()),
            s3_endpoint: Some("https://account.r2.cloudflarestorage.com".to_string()),
            ..UploadConfig::default()
        };
        let config = StorageConfig::from_upload_config(&uploads);
        match config.provider {
            StorageProvider::S3 { bucket, prefix, region, .. } => {
                assert_eq!(bucket, "cvs");
                assert_eq!(prefix, "uploads/cvs");
                assert_eq!(region, "auto");
            }
            StorageProvider::LocalFs { .. } => panic!("expected s3 provider"),
        }
    }
}
