//! Route configuration and setup

use crate::auth::basic_auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use shutterbox_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Server-level cap on in-flight requests.
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let cors = setup_cors(config);

    let admin_routes = admin_routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        basic_auth_middleware,
    ));

    public_routes()
        .merge(admin_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(
            config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::gallery::gallery))
        .route("/submit", get(handlers::submit::submit_form))
        .route("/upload", post(handlers::upload::upload))
        .route("/upload-success", get(handlers::submit::upload_success))
        .route("/health", get(handlers::health::health_check))
}

/// Routes behind basic auth.
fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config", get(handlers::config::show_config))
        .route("/approve", get(handlers::approve::review_queue))
        .route("/approve-submit", post(handlers::approve::approve_submit))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any_origin() {
        tracing::warn!("CORS configured to allow all origins");
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}
