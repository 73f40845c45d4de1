//! Badge, comparison badge and share card endpoints.
//!
//! Every path segment is validated before the cache is consulted. PNG output
//! rasterizes the same SVG on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::Response,
};
use equity_common::{EquityError, EquityResult};
use renderer::{badge_svg, comparison_svg, png::DEFAULT_SCALE, share_card_svg, svg_to_png, Column};
use tracing::instrument;

use super::common::{
    ok_response, parse_location, parse_metric, respond, ImageFormat, ImageParams,
    PNG_CONTENT_TYPE, SVG_CONTENT_TYPE,
};
use crate::state::AppState;

/// GET /api/badge/:metric/:location
#[instrument(skip(state))]
pub async fn badge_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((metric, location)): Path<(String, String)>,
    Query(params): Query<ImageParams>,
) -> Response {
    respond(badge(&state, &metric, &location, &params).await)
}

async fn badge(
    state: &AppState,
    metric: &str,
    location: &str,
    params: &ImageParams,
) -> EquityResult<Response> {
    let metric = parse_metric(metric)?;
    let location = parse_location(location)?;
    let format = params.image_format()?;

    let snapshot = state.stats.snapshot(location).await?;
    let svg = badge_svg(
        state.catalog.metric(metric),
        state.catalog.location(location),
        snapshot.get(metric),
    );
    image_response(svg, format).await
}

/// GET /api/compare/:metric/:left/:right
#[instrument(skip(state))]
pub async fn compare_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((metric, left, right)): Path<(String, String, String)>,
    Query(params): Query<ImageParams>,
) -> Response {
    respond(compare(&state, &metric, &left, &right, &params).await)
}

async fn compare(
    state: &AppState,
    metric: &str,
    left: &str,
    right: &str,
    params: &ImageParams,
) -> EquityResult<Response> {
    let metric = parse_metric(metric)?;
    let left = parse_location(left)?;
    let right = parse_location(right)?;
    let format = params.image_format()?;

    let (left_snapshot, right_snapshot) =
        tokio::try_join!(state.stats.snapshot(left), state.stats.snapshot(right))?;
    let svg = comparison_svg(
        state.catalog.metric(metric),
        Column {
            location: state.catalog.location(left),
            statistic: left_snapshot.get(metric),
        },
        Column {
            location: state.catalog.location(right),
            statistic: right_snapshot.get(metric),
        },
    );
    image_response(svg, format).await
}

/// GET /api/share/:metric/:location
#[instrument(skip(state))]
pub async fn share_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((metric, location)): Path<(String, String)>,
    Query(params): Query<ImageParams>,
) -> Response {
    respond(share_card(&state, &metric, &location, &params).await)
}

async fn share_card(
    state: &AppState,
    metric: &str,
    location: &str,
    params: &ImageParams,
) -> EquityResult<Response> {
    let metric = parse_metric(metric)?;
    let location = parse_location(location)?;
    let format = params.image_format()?;

    let snapshot = state.stats.snapshot(location).await?;
    let svg = share_card_svg(
        state.catalog.metric(metric),
        state.catalog.location(location),
        snapshot.get(metric),
    );
    image_response(svg, format).await
}

async fn image_response(svg: String, format: ImageFormat) -> EquityResult<Response> {
    match format {
        ImageFormat::Svg => Ok(ok_response(SVG_CONTENT_TYPE, svg)),
        ImageFormat::Png => {
            let png = tokio::task::spawn_blocking(move || svg_to_png(&svg, DEFAULT_SCALE))
                .await
                .map_err(|e| EquityError::InternalError(format!("render task failed: {}", e)))??;
            Ok(ok_response(PNG_CONTENT_TYPE, png))
        }
    }
}
