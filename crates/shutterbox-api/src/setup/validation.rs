//! Configuration validation
//!
//! Deployment checks on top of `Config::validate`: these only warn, since a
//! demo deployment may reasonably run with any of them.

use anyhow::Result;
use shutterbox_core::{Config, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.allows_any_origin() {
            tracing::warn!("CORS allows all origins (*) in production");
        }
        if config.storage_backend == StorageBackend::Memory {
            tracing::warn!("In-memory storage selected in production; uploads will not persist");
        }
        if config.debug {
            tracing::warn!("DEBUG is set in production; /config stays empty regardless");
        }
    }

    if config.access_key.is_none() && config.storage_backend == StorageBackend::S3 {
        tracing::info!("No ACCESS_KEY configured, using the default AWS credential chain");
    }

    if config.show_map && config.map_embed_url.is_none() {
        tracing::warn!("SHOW_MAP is enabled but MAP_EMBED_URL is not set");
    }

    Ok(())
}
