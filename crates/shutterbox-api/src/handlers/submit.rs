use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::error::HttpAppError;
use crate::handlers::{base_context, render};
use crate::state::AppState;

/// Upload form.
pub async fn submit_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpAppError> {
    let mut ctx = base_context(&state);
    ctx.insert("title", &state.config.submit_title);
    ctx.insert("description", &state.config.submit_description);
    ctx.insert("max_upload_mb", &(state.config.max_upload_bytes / 1024 / 1024));
    render(&state, "submit.html", &ctx)
}

pub async fn upload_success(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, HttpAppError> {
    let mut ctx = base_context(&state);
    ctx.insert("title", &state.config.submit_title);
    ctx.insert("toast", &state.config.file_upload_success_toast);
    render(&state, "upload_success.html", &ctx)
}
