//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::monitoring;
use crate::state::AppState;

/// Middleware settings for [`create_router`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Allow requests from any origin.
    pub cors: bool,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors: true,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Create the main router.
///
/// ## Route Structure
///
/// ```text
/// /api/websites
///   POST   /api/websites                          - Register website
///   GET    /api/websites                          - List websites
///   GET    /api/websites/{id}                     - Get website
///   POST   /api/websites/{id}/snapshots           - Capture snapshot
///   GET    /api/websites/{id}/snapshots           - Capture history (previews)
///   GET    /api/websites/{id}/snapshots/latest    - Newest snapshot, full content
///   GET    /api/websites/{id}/diff                - Diff of the two newest snapshots
///
/// /api/snapshots
///   POST   /api/snapshots                         - Capture by URL
///   GET    /api/snapshots/{id}                    - Get snapshot
///
/// /health  - Health check
/// ```
pub fn create_router(state: Arc<AppState>, options: &RouterOptions) -> Router {
    let website_routes = Router::new()
        .route(
            "/",
            get(handlers::list_websites).post(handlers::create_website),
        )
        .route("/{website_id}", get(handlers::get_website))
        .route(
            "/{website_id}/snapshots",
            get(handlers::list_snapshots).post(handlers::capture_snapshot),
        )
        .route(
            "/{website_id}/snapshots/latest",
            get(handlers::latest_snapshot),
        )
        .route("/{website_id}/diff", get(handlers::diff_latest))
        .with_state(state.clone());

    let snapshot_routes = Router::new()
        .route("/", post(handlers::capture_by_url))
        .route("/{snapshot_id}", get(handlers::get_snapshot))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(monitoring::health_check))
        .with_state(state);

    let router = Router::new()
        .nest("/api/websites", website_routes)
        .nest("/api/snapshots", snapshot_routes)
        .merge(monitoring_routes)
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if options.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
