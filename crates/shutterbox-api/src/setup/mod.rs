//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod templates;
pub mod validation;

use crate::auth::AdminCredential;
use crate::services::approval::strategy_for;
use crate::state::AppState;
use anyhow::{Context, Result};
use shutterbox_core::Config;
use shutterbox_processing::{ImageNormalizer, UploadValidator};
use shutterbox_storage::PhotoBucket;
use std::sync::Arc;

/// Initialize the entire application: validate config, connect storage,
/// load templates and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let bucket = storage::setup_storage(&config).await?;
    let templates = templates::load_templates(&config.template_path)?;

    build_app(config, bucket, templates)
}

/// Wire an already constructed bucket and template set into the router.
pub fn build_app(
    config: Config,
    bucket: PhotoBucket,
    templates: tera::Tera,
) -> Result<(Arc<AppState>, axum::Router)> {
    let credential = AdminCredential::new(config.admin_user.clone(), config.admin_pass.expose())
        .context("Failed to prepare admin credential")?;

    let config = Arc::new(config);
    let state = Arc::new(AppState {
        approval: strategy_for(&config),
        validator: UploadValidator::new(config.max_upload_bytes),
        normalizer: ImageNormalizer::new(config.max_dimension, config.jpeg_quality),
        templates: Arc::new(templates),
        credential,
        bucket,
        config: config.clone(),
    });

    tracing::info!(
        approval_mode = %state.approval.mode(),
        admin_user = %state.credential.username(),
        "Application state initialized"
    );

    let router = routes::setup_routes(&config, state.clone());
    Ok((state, router))
}
