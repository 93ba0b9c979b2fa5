use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shutterbox_core::Config;

use crate::state::AppState;

/// Non-secret runtime settings. Credentials never appear here.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub debug: bool,
    pub environment: String,
    pub storage_backend: String,
    pub bucket: Option<String>,
    pub region: String,
    pub endpoint: Option<String>,
    pub key_prefix: String,
    pub latest_key: String,
    pub approval_mode: String,
    pub gallery_limit: usize,
    pub review_limit: usize,
    pub presign_expiry_secs: u64,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub max_upload_bytes: usize,
    pub show_map: bool,
    pub carousel_interval_ms: u64,
    pub app_name: String,
}

impl From<&Config> for ConfigSummary {
    fn from(config: &Config) -> Self {
        Self {
            debug: config.debug,
            environment: config.environment.clone(),
            storage_backend: config.storage_backend.to_string(),
            bucket: config.s3_bucket().map(String::from),
            region: config.aws_region.clone(),
            endpoint: config.s3_endpoint.clone(),
            key_prefix: config.key_prefix.clone(),
            latest_key: config.latest_key.clone(),
            approval_mode: config.approval_mode.to_string(),
            gallery_limit: config.gallery_limit,
            review_limit: config.review_limit,
            presign_expiry_secs: config.presign_expiry_secs,
            max_dimension: config.max_dimension,
            jpeg_quality: config.jpeg_quality,
            max_upload_bytes: config.max_upload_bytes,
            show_map: config.show_map,
            carousel_interval_ms: config.carousel_interval_ms,
            app_name: config.app_name.clone(),
        }
    }
}

/// Debug dump of the running configuration; an empty body unless debug is
/// enabled outside production.
pub async fn show_config(State(state): State<Arc<AppState>>) -> Response {
    if state.config.debug_enabled() {
        Json(ConfigSummary::from(state.config.as_ref())).into_response()
    } else {
        String::new().into_response()
    }
}
