//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Primary (Postgres) store configuration.
    pub database: DatabaseConfig,
    /// Document HTTP API used when the primary store is unavailable.
    pub data_api: DataApiConfig,
    /// Collection names for stored documents.
    pub collections: CollectionsConfig,
    /// Outbound mail configuration.
    pub email: EmailConfig,
    /// Contact details shown under every estimate.
    pub contact: ContactConfig,
    /// CV upload configuration.
    pub uploads: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origins: empty disables CORS, `*` allows any origin,
    /// otherwise a comma separated list.
    pub cors_origins: String,
    /// Directory with the chatbot frontend, served for unmatched routes.
    pub static_dir: Option<PathBuf>,
    /// Emit logs as JSON lines instead of human readable text.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: String::new(),
            static_dir: None,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Parsed CORS origins, `None` when CORS is disabled.
    #[must_use]
    pub fn cors_origin_list(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = split_list(&self.cors_origins);
        if origins.is_empty() { None } else { Some(origins) }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL. The primary store is disabled when unset.
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// Returns the connection URL if one is configured and non-blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }
}

/// Document HTTP API configuration (insert-one style endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataApiConfig {
    /// Base URL of the API, without trailing slash.
    pub url: Option<String>,
    /// API key sent in the `api-key` header.
    pub api_key: Option<String>,
    /// Data source (cluster) name.
    pub data_source: Option<String>,
    /// Database name.
    pub database: String,
}

impl Default for DataApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            data_source: None,
            database: "chatbot".to_string(),
        }
    }
}

impl DataApiConfig {
    /// The API is only used when URL, key and data source are all set.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        non_blank(self.url.as_deref()).is_some()
            && non_blank(self.api_key.as_deref()).is_some()
            && non_blank(self.data_source.as_deref()).is_some()
    }
}

/// Collection names for stored documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Collection receiving chatbot leads.
    pub leads: String,
    /// Collection receiving CV uploads.
    pub applications: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            leads: "leads".to_string(),
            applications: "applications".to_string(),
        }
    }
}

/// Which mail transports are attempted. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailTransportMode {
    /// SendGrid API first, SMTP when the API delivered nothing.
    #[default]
    Auto,
    /// SendGrid API only.
    Api,
    /// SMTP only.
    Smtp,
}

impl std::str::FromStr for EmailTransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "api" => Ok(Self::Api),
            "smtp" => Ok(Self::Smtp),
            other => Err(format!(
                "unknown email transport '{other}', expected auto, api or smtp"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for EmailTransportMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl EmailTransportMode {
    /// Whether the SendGrid API is attempted.
    #[must_use]
    pub const fn uses_api(self) -> bool {
        matches!(self, Self::Auto | Self::Api)
    }

    /// Whether SMTP is attempted.
    #[must_use]
    pub const fn uses_smtp(self) -> bool {
        matches!(self, Self::Auto | Self::Smtp)
    }
}

/// Email configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Transport selection.
    pub transport: EmailTransportMode,
    /// SendGrid API key.
    pub sendgrid_api_key: Option<String>,
    /// Enable SendGrid sandbox mode (mail is accepted but not delivered).
    pub sandbox: bool,
    /// SendGrid API base URL.
    pub api_base_url: String,
    /// SMTP server host.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password. Falls back to the SendGrid API key.
    pub smtp_password: Option<String>,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Comma separated sales team recipients.
    pub sales_emails: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransportMode::Auto,
            sendgrid_api_key: None,
            sandbox: false,
            api_base_url: "https://api.sendgrid.com".to_string(),
            smtp_host: "smtp.sendgrid.net".to_string(),
            smtp_port: 587,
            smtp_username: "apikey".to_string(),
            smtp_password: None,
            from_email: "no-reply@infinitecard.in".to_string(),
            from_name: "Zeno".to_string(),
            sales_emails: "partha@infinitetechai.com".to_string(),
        }
    }
}

impl EmailConfig {
    /// The SendGrid API key, if set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.sendgrid_api_key.as_deref())
    }

    /// The SMTP password, falling back to the SendGrid API key.
    #[must_use]
    pub fn smtp_password(&self) -> Option<&str> {
        non_blank(self.smtp_password.as_deref()).or_else(|| self.api_key())
    }

    /// Parsed sales recipients.
    #[must_use]
    pub fn recipients(&self) -> Vec<String> {
        split_list(&self.sales_emails)
    }
}

/// Contact details printed under estimates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "partha@infinitetechai.com".to_string(),
            phone: "+91 98847 77171".to_string(),
        }
    }
}

/// CV upload configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory (or bucket prefix) receiving uploaded CVs.
    pub root: PathBuf,
    /// Maximum accepted file size in bytes.
    pub max_file_size: u64,
    /// S3-compatible bucket. When set, CVs go to the bucket instead of disk.
    pub s3_bucket: Option<String>,
    /// S3 endpoint URL.
    pub s3_endpoint: Option<String>,
    /// S3 region.
    pub s3_region: String,
    /// S3 access key ID.
    pub s3_access_key_id: Option<String>,
    /// S3 secret access key.
    pub s3_secret_access_key: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("uploads/cvs"),
            max_file_size: 5 * 1024 * 1024,
            s3_bucket: None,
            s3_endpoint: None,
            s3_region: "auto".to_string(),
            s3_access_key_id: None,
            s3_secret_access_key: None,
        }
    }
}

impl UploadConfig {
    /// The configured S3 bucket, if any.
    #[must_use]
    pub fn s3_bucket(&self) -> Option<&str> {
        non_blank(self.s3_bucket.as_deref())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ZENO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
