//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// API routes under `/api/v1`, without layers or the static fallback.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/curriculum/empty", get(http::http_get_empty))
        .route("/api/v1/curriculum/validate", post(http::http_post_validate))
        .route("/api/v1/curriculum/submit", post(http::http_post_submit))
        .route("/api/v1/curriculum/manual", post(http::http_post_manual))
        .route("/api/v1/curriculum/generate", post(http::http_post_generate))
        .route("/api/v1/curriculum/review", post(http::http_post_review))
        .route("/api/v1/curriculum/export/json", post(http::http_post_export_json))
}

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static form bundle from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    api_router()
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
