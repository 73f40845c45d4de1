//! Gender equality statistics API.
//!
//! Serves per-location snapshots of five gender-equality metrics as JSON,
//! CSV exports, SVG/PNG badges and share cards. Upstream data comes from the
//! World Bank indicators API through a fail-soft client; every value is
//! cached for a freshness window and falls back to catalog values when
//! upstream has nothing.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;
pub mod statistics;
pub mod warming;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Statistics
        .route("/api/stats/:location", get(handlers::stats_handler))
        .route("/api/trends/:metric/:location", get(handlers::trend_handler))
        .route("/api/export/:location/:format", get(handlers::export_handler))
        // Images
        .route("/api/badge/:metric/:location", get(handlers::badge_handler))
        .route(
            "/api/compare/:metric/:left/:right",
            get(handlers::compare_handler),
        )
        .route("/api/share/:metric/:location", get(handlers::share_handler))
        // Cache management
        .route("/api/cache", get(handlers::cache_stats_handler))
        .route("/api/cache/clear", post(handlers::cache_clear_handler))
        // Health and metrics
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
