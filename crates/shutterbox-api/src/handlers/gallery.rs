use std::sync::Arc;

use axum::{extract::State, response::Html};
use futures::future::join_all;
use serde::Serialize;
use shutterbox_core::LastModified;

use crate::error::HttpAppError;
use crate::handlers::{base_context, render};
use crate::state::AppState;
use crate::toast::UploadToast;

#[derive(Debug, Serialize)]
struct GalleryPhoto {
    key: String,
    /// `None` renders the slot without an image.
    url: Option<String>,
    contributed: String,
}

/// Public gallery.
///
/// Storage failures degrade to an empty gallery with a notice; they never
/// turn into an error status.
#[tracing::instrument(skip_all)]
pub async fn gallery(
    State(state): State<Arc<AppState>>,
    toast: UploadToast,
) -> Result<Html<String>, HttpAppError> {
    let config = &state.config;

    let (objects, storage_unavailable) = match state.approval.gallery(&state.bucket).await {
        Ok(objects) => (objects, false),
        Err(e) => {
            tracing::warn!(error = %e, "Gallery listing failed, rendering empty gallery");
            (Vec::new(), true)
        }
    };

    let urls = join_all(objects.iter().map(|o| state.bucket.presign_get(&o.key))).await;

    let mut last_update = state.bucket.last_modified(&config.latest_key).await;
    if last_update == LastModified::Unknown {
        if let Some(newest) = objects.first() {
            last_update = LastModified::At(newest.last_modified);
        }
    }

    let photos: Vec<GalleryPhoto> = objects
        .into_iter()
        .zip(urls)
        .map(|(obj, url)| GalleryPhoto {
            contributed: LastModified::At(obj.last_modified).to_string(),
            key: obj.key,
            url,
        })
        .collect();

    let mut ctx = base_context(&state);
    ctx.insert("title", &config.page_title);
    ctx.insert("description", &config.page_description);
    ctx.insert("photos", &photos);
    ctx.insert("last_update", &last_update.to_string());
    ctx.insert("show_map", &config.show_map);
    ctx.insert("map_embed_url", &config.map_embed_url);
    ctx.insert("carousel_interval_ms", &config.carousel_interval_ms);
    ctx.insert("storage_unavailable", &storage_unavailable);
    ctx.insert(
        "toast",
        &toast.0.then(|| config.file_upload_success_toast.clone()),
    );

    render(&state, "index.html", &ctx)
}
