//! Snapshot and trend JSON endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};
use equity_common::EquityResult;
use tracing::instrument;

use super::common::{json_response, parse_location, parse_metric, respond};
use crate::state::AppState;

/// GET /api/stats/:location
#[instrument(skip(state))]
pub async fn stats_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(location): Path<String>,
) -> Response {
    respond(snapshot_json(&state, &location).await)
}

async fn snapshot_json(state: &AppState, location: &str) -> EquityResult<Response> {
    let location = parse_location(location)?;
    let snapshot = state.stats.snapshot(location).await?;
    Ok(json_response(snapshot.as_ref()))
}

/// GET /api/trends/:metric/:location
#[instrument(skip(state))]
pub async fn trend_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((metric, location)): Path<(String, String)>,
) -> Response {
    respond(trend_json(&state, &metric, &location).await)
}

async fn trend_json(state: &AppState, metric: &str, location: &str) -> EquityResult<Response> {
    let metric = parse_metric(metric)?;
    let location = parse_location(location)?;
    let series = state.stats.trend(metric, location).await?;
    Ok(json_response(series.as_ref()))
}
