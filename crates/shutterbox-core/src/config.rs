//! Configuration module
//!
//! The whole process is configured by a single JSON document loaded once at
//! startup. Keys use SCREAMING_SNAKE_CASE (`ADMIN_PASS`, `S3_BUCKET_NAME`, ...)
//! so existing deployment documents load unchanged. The loaded [`Config`] is
//! read-only and is handed to components explicitly.

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage_types::StorageBackend;

/// Environment variable holding the config document path.
pub const CONFIG_PATH_ENV: &str = "SHUTTERBOX_CONFIG_PATH";
/// Path used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

const ADMIN_USER: &str = "admin";
const AWS_REGION: &str = "us-east-1";
const KEY_PREFIX: &str = "upload/";
const LATEST_KEY: &str = "latest";
const APPROVED_TAG_KEY: &str = "approved";
const APPROVED_TAG_VALUE: &str = "true";
const GALLERY_LIMIT: usize = 3;
const REVIEW_LIMIT: usize = 3;
const PRESIGN_EXPIRY_SECS: u64 = 3600;
const MAX_DIMENSION: u32 = 1000;
const JPEG_QUALITY: u8 = 75;
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const CAROUSEL_INTERVAL_MS: u64 = 5000;
const BIND_ADDRESS: &str = "0.0.0.0";
const PORT: u16 = 5000;
const TEMPLATE_PATH: &str = "./templates";

/// String that never shows up in `Debug` output or logs.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

/// How an admin approval is recorded in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    /// Tag the object `approved=true`; the gallery lists tagged objects.
    #[default]
    Tag,
    /// Copy the object to the well-known latest key and delete the source.
    Rename,
}

impl fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalMode::Tag => write!(f, "tag"),
            ApprovalMode::Rename => write!(f, "rename"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    // Admin credential
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    pub admin_pass: SecretString,

    // Storage configuration
    #[serde(default)]
    pub storage_backend: StorageBackend,
    #[serde(default)]
    pub access_key: Option<SecretString>,
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
    #[serde(default = "default_aws_region")]
    pub aws_region: String,
    #[serde(default)]
    pub s3_bucket_name: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    #[serde(default)]
    pub s3_endpoint: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_latest_key")]
    pub latest_key: String,
    #[serde(default = "default_approved_tag_key")]
    pub approved_tag_key: String,
    #[serde(default = "default_approved_tag_value")]
    pub approved_tag_value: String,
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,

    // Moderation
    #[serde(default)]
    pub approval_mode: ApprovalMode,
    #[serde(default = "default_gallery_limit")]
    pub gallery_limit: usize,
    #[serde(default = "default_review_limit")]
    pub review_limit: usize,

    // Upload processing
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    // Display strings
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub page_description: String,
    #[serde(default)]
    pub submit_title: String,
    #[serde(default)]
    pub submit_description: String,
    #[serde(default)]
    pub file_upload_success_toast: String,

    // Feature toggles
    #[serde(default)]
    pub show_map: bool,
    #[serde(default)]
    pub map_embed_url: Option<String>,
    #[serde(default = "default_carousel_interval_ms")]
    pub carousel_interval_ms: u64,

    // Runtime
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_template_path")]
    pub template_path: String,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_admin_user() -> String {
    ADMIN_USER.to_string()
}

fn default_aws_region() -> String {
    AWS_REGION.to_string()
}

fn default_key_prefix() -> String {
    KEY_PREFIX.to_string()
}

fn default_latest_key() -> String {
    LATEST_KEY.to_string()
}

fn default_approved_tag_key() -> String {
    APPROVED_TAG_KEY.to_string()
}

fn default_approved_tag_value() -> String {
    APPROVED_TAG_VALUE.to_string()
}

fn default_presign_expiry_secs() -> u64 {
    PRESIGN_EXPIRY_SECS
}

fn default_gallery_limit() -> usize {
    GALLERY_LIMIT
}

fn default_review_limit() -> usize {
    REVIEW_LIMIT
}

fn default_max_dimension() -> u32 {
    MAX_DIMENSION
}

fn default_jpeg_quality() -> u8 {
    JPEG_QUALITY
}

fn default_max_upload_bytes() -> usize {
    MAX_UPLOAD_BYTES
}

fn default_carousel_interval_ms() -> u64 {
    CAROUSEL_INTERVAL_MS
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_bind_address() -> String {
    BIND_ADDRESS.to_string()
}

fn default_port() -> u16 {
    PORT
}

fn default_template_path() -> String {
    TEMPLATE_PATH.to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Config {
    /// Load the config document named by `SHUTTERBOX_CONFIG_PATH`
    /// (default `config.json`) and validate it.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
        })?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(path = %path.display(), "Configuration document loaded");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid config document: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.admin_user.trim().is_empty() {
            return Err(anyhow::anyhow!("ADMIN_USER cannot be empty"));
        }

        if self.admin_pass.is_empty() {
            return Err(anyhow::anyhow!("ADMIN_PASS must be set"));
        }

        if self.storage_backend == StorageBackend::S3 && self.s3_bucket().is_none() {
            return Err(anyhow::anyhow!(
                "S3_BUCKET_NAME must be set when using S3 storage backend"
            ));
        }

        if self.access_key.is_some() != self.secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "ACCESS_KEY and SECRET_ACCESS_KEY must be set together"
            ));
        }

        if self.latest_key.is_empty() {
            return Err(anyhow::anyhow!("LATEST_KEY cannot be empty"));
        }

        if self.gallery_limit == 0 || self.review_limit == 0 {
            return Err(anyhow::anyhow!(
                "GALLERY_LIMIT and REVIEW_LIMIT must be greater than 0"
            ));
        }

        if self.max_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_DIMENSION must be greater than 0"));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_BYTES must be greater than 0"));
        }

        if self.presign_expiry_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_EXPIRY_SECS must be greater than 0"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    /// Debug output is only ever exposed outside production.
    pub fn debug_enabled(&self) -> bool {
        self.debug && !self.is_production()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket_name
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Storage key for an uploaded file name.
    pub fn upload_key(&self, filename: &str) -> String {
        format!("{}{}", self.key_prefix, filename)
    }
}
