//! Storage service implementation using Apache OpenDAL.

use chrono::{DateTime, Utc};
use opendal::{Operator, services};
use tracing::info;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Timestamp prefix format for stored files.
const STORED_NAME_FORMAT: &str = "%Y%m%d%H%M%S";

/// A file written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key, also the filename reported to the client.
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage service for uploaded CVs.
#[derive(Debug)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                prefix,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .root(prefix)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = access_key_id {
                    builder = builder.access_key_id(key);
                }
                if let Some(secret) = secret_access_key {
                    builder = builder.secret_access_key(secret);
                }
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };
        Ok(operator)
    }

    /// Validate an upload against config constraints.
    ///
    /// The extension is checked before the size.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension or file size is not accepted.
    pub fn validate_upload(&self, filename: &str, size: u64) -> Result<(), StorageError> {
        if !self.config.is_extension_allowed(filename) {
            return Err(StorageError::invalid_extension(filename));
        }

        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }

        Ok(())
    }

    /// Name a file is stored under: `<UTC %Y%m%d%H%M%S>_<secure filename>`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is left of the filename after sanitizing.
    pub fn stored_name(filename: &str, at: DateTime<Utc>) -> Result<String, StorageError> {
        let safe = secure_filename(filename)
            .ok_or_else(|| StorageError::InvalidFilename(filename.to_string()))?;
        Ok(format!("{}_{safe}", at.format(STORED_NAME_FORMAT)))
    }

    /// Validates and writes an uploaded file under a name stamped with `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the write fails.
    pub async fn store_at(
        &self,
        filename: &str,
        content: Vec<u8>,
        at: DateTime<Utc>,
    ) -> Result<StoredFile, StorageError> {
        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
        self.validate_upload(filename, size)?;

        let key = Self::stored_name(filename, at)?;
        self.operator.write(&key, content).await?;

        info!(
            key = %key,
            size,
            provider = self.provider_name(),
            "Stored uploaded file"
        );

        Ok(StoredFile {
            filename: key,
            size,
        })
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Reduces an uploaded filename to a safe single path segment.
///
/// Non-ASCII characters are dropped, whitespace and path separators become
/// `_`, anything other than ASCII alphanumerics, `.`, `-` and `_` is removed
/// and leading or trailing dots and underscores are stripped. Returns `None`
/// if nothing is left.
#[must_use]
pub fn secure_filename(filename: &str) -> Option<String> {
    let spaced: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_ascii_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
