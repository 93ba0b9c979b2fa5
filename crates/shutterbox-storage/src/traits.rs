//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use shutterbox_core::{PhotoObject, TagSet};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Tagging failed: {0}")]
    TaggingFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One page of a bucket listing.
///
/// Entries come back in key order. `next_token` is the continuation cursor
/// for the following page, `None` once the listing is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<PhotoObject>,
    pub next_token: Option<String>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, in-memory) implement this trait. Each method is a
/// single provider call; none of them retry.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List one page of objects whose key starts with `prefix`.
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> StorageResult<ObjectPage>;

    /// Fetch the full tag set of an object.
    async fn get_tags(&self, storage_key: &str) -> StorageResult<TagSet>;

    /// Replace the full tag set of an object.
    async fn put_tags(&self, storage_key: &str, tags: &TagSet) -> StorageResult<()>;

    /// Upload data to a specific storage key, overwriting any existing object.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Fetch object metadata. Missing objects yield `StorageError::NotFound`.
    async fn head(&self, storage_key: &str) -> StorageResult<PhotoObject>;

    /// Generate a presigned/temporary URL for direct access (GET)
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Server-side copy of an object to another key in the same bucket.
    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<()>;

    /// Delete a file by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
