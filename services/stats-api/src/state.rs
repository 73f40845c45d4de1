//! Application state shared across request handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use equity_common::{Catalog, Clock, SystemClock};
use indicator_client::{IndicatorSource, WorldBankClient};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use crate::aggregate::StatsService;
use crate::cache::FreshnessCache;
use crate::config::ServiceConfig;

pub struct AppState {
    pub stats: StatsService,
    pub catalog: Arc<Catalog>,
    /// Absent when no recorder is installed (tests).
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build production state: catalog from disk or built in, World Bank
    /// client, system clock.
    pub async fn new(config: &ServiceConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref())
            .context("Failed to load indicator catalog")?;

        let client = WorldBankClient::new(config.upstream.clone())
            .context("Failed to build upstream HTTP client")?;
        info!(
            base_url = %config.upstream.base_url,
            timeout_secs = config.upstream.request_timeout.as_secs(),
            "Upstream client initialized"
        );

        let mut state = Self::from_parts(
            Arc::new(catalog),
            Arc::new(client),
            Arc::new(SystemClock),
            config,
        );
        state.metrics_handle = metrics_handle;
        Ok(state)
    }

    /// Assemble state from explicit parts.
    pub fn from_parts(
        catalog: Arc<Catalog>,
        source: Arc<dyn IndicatorSource>,
        clock: Arc<dyn Clock>,
        config: &ServiceConfig,
    ) -> Self {
        let cache = Arc::new(FreshnessCache::new(config.cache_ttl, clock.clone()));
        let stats = StatsService::new(catalog.clone(), source, cache, clock)
            .with_trend_years(config.trend_years);
        Self {
            stats,
            catalog,
            metrics_handle: None,
        }
    }
}
