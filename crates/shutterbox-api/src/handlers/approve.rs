use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    Extension,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use shutterbox_core::{AppError, LastModified};

use crate::auth::AdminIdentity;
use crate::error::HttpAppError;
use crate::handlers::{base_context, render};
use crate::services::approval::approve_by_index;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ReviewEntry {
    index: usize,
    key: String,
    url: Option<String>,
    uploaded: String,
}

/// Review queue, newest first. Each entry carries its index and key so the
/// approval form can submit both.
#[tracing::instrument(skip_all)]
pub async fn review_queue(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
) -> Result<Html<String>, HttpAppError> {
    let (objects, storage_unavailable) = match state.approval.review_queue(&state.bucket).await {
        Ok(objects) => (objects, false),
        Err(e) => {
            tracing::warn!(
                admin = %admin.username,
                error = %e,
                "Review listing failed, rendering empty queue"
            );
            (Vec::new(), true)
        }
    };

    let urls = join_all(objects.iter().map(|o| state.bucket.presign_get(&o.key))).await;

    let entries: Vec<ReviewEntry> = objects
        .into_iter()
        .zip(urls)
        .enumerate()
        .map(|(index, (obj, url))| ReviewEntry {
            index,
            uploaded: LastModified::At(obj.last_modified).to_string(),
            key: obj.key,
            url,
        })
        .collect();

    let mut ctx = base_context(&state);
    ctx.insert("entries", &entries);
    ctx.insert("mode", &state.approval.mode().to_string());
    ctx.insert("storage_unavailable", &storage_unavailable);

    render(&state, "approve.html", &ctx)
}

#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    pub index: String,
    #[serde(default)]
    pub key: Option<String>,
}

/// Approve the entry at `index` of the current review listing.
///
/// Out-of-range indexes are a 400 and a `key` that no longer sits at that
/// index is a 409; neither touches storage.
#[tracing::instrument(skip_all)]
pub async fn approve_submit(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Form(form): Form<ApproveForm>,
) -> Result<Redirect, HttpAppError> {
    let index: usize = form.index.trim().parse().map_err(|_| {
        AppError::BadRequest(format!("Invalid index: {:?}", form.index))
    })?;
    let expected_key = form.key.as_deref().map(str::trim).filter(|k| !k.is_empty());

    let approval =
        approve_by_index(state.approval.as_ref(), &state.bucket, index, expected_key).await?;

    tracing::info!(
        admin = %admin.username,
        index,
        key = %approval.key,
        applied = approval.applied,
        "Approval request handled"
    );

    Ok(Redirect::to("/"))
}
