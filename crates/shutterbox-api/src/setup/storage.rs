//! Storage setup and initialization

use anyhow::Result;
use shutterbox_core::Config;
use shutterbox_storage::{create_storage, PhotoBucket};

pub async fn setup_storage(config: &Config) -> Result<PhotoBucket> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?config.s3_bucket(),
        prefix = %config.key_prefix,
        "Storage initialized"
    );

    Ok(PhotoBucket::new(storage, config.presign_expiry()))
}
