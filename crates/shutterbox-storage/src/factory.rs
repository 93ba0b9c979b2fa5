use crate::memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
use crate::s3::{S3Credentials, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use shutterbox_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config.s3_bucket().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_BUCKET_NAME not configured".to_string())
            })?;

            let credentials = match (&config.access_key, &config.secret_access_key) {
                (Some(access), Some(secret)) => Some(S3Credentials {
                    access_key_id: access.expose().to_string(),
                    secret_access_key: secret.expose().to_string(),
                }),
                _ => None,
            };

            let storage = S3Storage::new(
                bucket,
                config.aws_region.clone(),
                config.s3_endpoint.clone(),
                credentials,
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; uploads are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
