//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indicator_client::{client::DEFAULT_BASE_URL, ClientConfig};

use crate::aggregate::DEFAULT_TREND_YEARS;

#[derive(Parser, Debug, Clone)]
#[command(name = "stats-api")]
#[command(about = "Gender equality statistics API server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "STATS_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "STATS_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// YAML indicator catalog replacing the built-in one
    #[arg(long, env = "STATS_CATALOG_PATH")]
    pub catalog: Option<PathBuf>,

    /// Upstream indicators API base URL
    #[arg(long, env = "STATS_UPSTREAM_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_url: String,

    /// Per-request upstream timeout in seconds
    #[arg(long, env = "STATS_UPSTREAM_TIMEOUT_SECS", default_value_t = 15)]
    pub upstream_timeout_secs: u64,

    /// Freshness window for cached statistics in seconds
    #[arg(long, env = "STATS_CACHE_TTL_SECS", default_value_t = 86_400)]
    pub cache_ttl_secs: u64,

    /// Years covered by trend series
    #[arg(long, env = "STATS_TREND_YEARS", default_value_t = DEFAULT_TREND_YEARS)]
    pub trend_years: u32,

    /// Build every location's snapshot before accepting requests
    #[arg(long, env = "STATS_WARM_CACHE", default_value_t = false)]
    pub warm_cache: bool,
}

/// Runtime settings derived from [`Args`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub catalog_path: Option<PathBuf>,
    pub upstream: ClientConfig,
    pub cache_ttl: Duration,
    pub trend_years: u32,
    pub warm_cache: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            upstream: ClientConfig::default(),
            cache_ttl: crate::cache::DEFAULT_TTL,
            trend_years: DEFAULT_TREND_YEARS,
            warm_cache: false,
        }
    }
}

impl From<&Args> for ServiceConfig {
    fn from(args: &Args) -> Self {
        Self {
            catalog_path: args.catalog.clone(),
            upstream: ClientConfig {
                base_url: args.upstream_url.trim_end_matches('/').to_string(),
                request_timeout: Duration::from_secs(args.upstream_timeout_secs),
                ..ClientConfig::default()
            },
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            trend_years: args.trend_years,
            warm_cache: args.warm_cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["stats-api"]);
        let config = ServiceConfig::from(&args);
        assert_eq!(config.cache_ttl, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(15));
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "stats-api",
            "--upstream-url",
            "http://localhost:9000/v2/",
            "--cache-ttl-secs",
            "60",
            "--catalog",
            "/etc/stats/catalog.yaml",
            "--warm-cache",
        ]);
        let config = ServiceConfig::from(&args);
        assert_eq!(config.upstream.base_url, "http://localhost:9000/v2");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(
            config.catalog_path.as_deref(),
            Some(std::path::Path::new("/etc/stats/catalog.yaml"))
        );
        assert!(config.warm_cache);
    }
}
