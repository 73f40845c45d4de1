//! HTTP client for the World Bank indicators API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::response::{latest_observation, parse_points};
use crate::source::{IndicatorQuery, IndicatorSource, Observation, RawPoint};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Failure of a single upstream request.
///
/// Only used inside this crate's fallible helpers; the [`IndicatorSource`]
/// implementation logs it and reports "no data" instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Rows requested per page.
    pub per_page: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            per_page: 100,
        }
    }
}

/// [`IndicatorSource`] backed by the World Bank API.
#[derive(Debug, Clone)]
pub struct WorldBankClient {
    client: Client,
    config: ClientConfig,
}

impl WorldBankClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self { client, config })
    }

    /// Request URL for a query. `most_recent` asks upstream for the single
    /// most recent non-empty value.
    pub fn url(&self, query: &IndicatorQuery, most_recent: bool) -> String {
        let mut url = format!(
            "{}/country/{}/indicator/{}?format=json&date={}&per_page={}",
            self.config.base_url.trim_end_matches('/'),
            query.location_code,
            query.indicator_code,
            query.window.to_param(),
            self.config.per_page,
        );
        if most_recent {
            url.push_str("&mrv=1");
        }
        url
    }

    async fn fetch_points(
        &self,
        query: &IndicatorQuery,
        most_recent: bool,
    ) -> Result<Vec<RawPoint>, FetchError> {
        let url = self.url(query, most_recent);
        debug!(url = %url, "Fetching indicator");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        parse_points(&body)
    }
}

#[async_trait]
impl IndicatorSource for WorldBankClient {
    #[instrument(skip(self), fields(location = %query.location_code, indicator = %query.indicator_code))]
    async fn latest(&self, query: &IndicatorQuery) -> Option<Observation> {
        match self.fetch_points(query, true).await {
            Ok(points) => {
                let latest = latest_observation(&points);
                if latest.is_none() {
                    debug!("No observation in window");
                }
                latest
            }
            Err(e) => {
                warn!(error = %e, "Indicator fetch failed, treating as no data");
                None
            }
        }
    }

    #[instrument(skip(self), fields(location = %query.location_code, indicator = %query.indicator_code))]
    async fn series(&self, query: &IndicatorQuery) -> Vec<RawPoint> {
        self.fetch_points(query, false).await.unwrap_or_else(|e| {
            warn!(error = %e, "Indicator series fetch failed, treating as no data");
            Vec::new()
        })
    }
}
