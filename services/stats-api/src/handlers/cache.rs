//! Cache management endpoints.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::state::AppState;

/// GET /api/cache - cache statistics
pub async fn cache_stats_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.stats.cache().stats_snapshot().await)
}

/// POST /api/cache/clear - drop every cached snapshot and trend
pub async fn cache_clear_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let cleared = state.stats.cache().len().await;
    state.stats.cache().clear().await;
    info!(cleared, "Cache cleared via API");
    (StatusCode::OK, Json(json!({ "cleared": cleared })))
}
