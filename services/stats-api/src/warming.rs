//! Startup warming of the statistics cache.
//!
//! Builds every location's snapshot once so the first requests after a
//! deploy are served from cache. Upstream failures are already resolved to
//! fallbacks inside the normalizers, so warming cannot fail.

use std::sync::Arc;
use std::time::Instant;

use equity_common::Location;
use futures::future::join_all;
use tracing::info;

use crate::state::AppState;

/// Warm `stats:<location>` for every location.
pub async fn warm_startup(state: &Arc<AppState>) {
    info!(locations = Location::ALL.len(), "Starting cache warming");
    let start = Instant::now();

    let builds = Location::ALL.map(|location| {
        let state = state.clone();
        async move { state.stats.refresh_snapshot(location).await }
    });
    let warmed = join_all(builds).await.len();

    info!(
        duration_ms = start.elapsed().as_millis() as u64,
        warmed,
        "Cache warming complete"
    );
}
