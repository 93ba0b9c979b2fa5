//! Accepting a submitted photo: validate, normalize, store.

use crate::state::AppState;
use shutterbox_processing::{NormalizeError, ValidationError};
use shutterbox_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum UploadRejection {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Storage rejected upload: {0}")]
    Storage(#[from] StorageError),
}

/// A stored upload.
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

/// Validate the file part, re-encode it and write it under the upload prefix.
///
/// An existing object with the same filename is overwritten. Nothing is
/// written unless every step before the upload succeeded.
pub async fn store_upload(
    state: &AppState,
    filename: Option<&str>,
    content_type: Option<&str>,
    data: Vec<u8>,
) -> Result<StoredPhoto, UploadRejection> {
    let upload = state.validator.validate(filename, content_type, data.len())?;

    let normalized = state.normalizer.normalize(data).await?;

    let key = state.config.upload_key(&upload.filename);
    let (width, height) = (normalized.width, normalized.height);
    let content_type = normalized.content_type();
    state.bucket.upload(&key, normalized.data, content_type).await?;

    tracing::info!(
        key = %key,
        original_content_type = %upload.content_type,
        width,
        height,
        "Upload stored"
    );

    Ok(StoredPhoto { key, width, height })
}
