pub mod approve;
pub mod config;
pub mod gallery;
pub mod health;
pub mod submit;
pub mod upload;

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::response::Html;

/// Display settings every page needs.
pub(crate) fn base_context(state: &AppState) -> tera::Context {
    let config = &state.config;
    let mut ctx = tera::Context::new();
    ctx.insert("app_name", &config.app_name);
    ctx.insert("submit_title", &config.submit_title);
    ctx
}

pub(crate) fn render(
    state: &AppState,
    template: &str,
    ctx: &tera::Context,
) -> Result<Html<String>, HttpAppError> {
    let body = state.templates.render(template, ctx)?;
    Ok(Html(body))
}
