use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Redirect,
};

use crate::services::upload::store_upload;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const SUBMIT_PATH: &str = "/submit";

/// Multipart photo upload.
///
/// Every failure, including an unreadable body or a corrupt image, sends
/// the visitor back to the form. Success redirects per approval mode.
#[tracing::instrument(skip_all)]
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Redirect {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e.body_text(), "Unreadable multipart body");
                return Redirect::to(SUBMIT_PATH);
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e.body_text(), "Failed to read file part");
                return Redirect::to(SUBMIT_PATH);
            }
        };

        return match store_upload(
            &state,
            filename.as_deref(),
            content_type.as_deref(),
            data.to_vec(),
        )
        .await
        {
            Ok(_) => Redirect::to(state.approval.upload_redirect()),
            Err(e) => {
                tracing::info!(
                    error = %e,
                    filename = ?filename,
                    content_type = ?content_type,
                    "Upload rejected"
                );
                Redirect::to(SUBMIT_PATH)
            }
        };
    }

    tracing::debug!("Upload without a file part");
    Redirect::to(SUBMIT_PATH)
}
