//! Downloadable snapshot exports.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};
use equity_common::EquityResult;
use renderer::{snapshot_csv, snapshot_json, ExportFormat};
use tracing::instrument;

use super::common::{ok_response, parse_location, respond, with_attachment};
use crate::state::AppState;

/// GET /api/export/:location/:format
#[instrument(skip(state))]
pub async fn export_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((location, format)): Path<(String, String)>,
) -> Response {
    respond(export(&state, &location, &format).await)
}

async fn export(state: &AppState, location: &str, format: &str) -> EquityResult<Response> {
    let location = parse_location(location)?;
    let format = ExportFormat::parse(format)?;
    let snapshot = state.stats.snapshot(location).await?;

    let body = match format {
        ExportFormat::Csv => snapshot_csv(&snapshot),
        ExportFormat::Json => snapshot_json(&snapshot)?,
    };
    let filename = format!("gender-equality-{}.{}", location, format.extension());
    Ok(with_attachment(
        ok_response(format.content_type(), body),
        &filename,
    ))
}
