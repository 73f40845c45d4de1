//! Prometheus counters for the statistics pipeline.
//!
//! Counters are recorded through the `metrics` facade. When no recorder is
//! installed (unit and router tests) the calls are no-ops.

use equity_common::Metric;
use metrics::{counter, describe_counter};

use crate::cache::CacheKey;

pub const CACHE_HITS: &str = "stats_cache_hits_total";
pub const CACHE_MISSES: &str = "stats_cache_misses_total";
pub const UPSTREAM_FALLBACKS: &str = "stats_upstream_fallbacks_total";

/// Register descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(CACHE_HITS, "Cache lookups answered by a fresh entry");
    describe_counter!(CACHE_MISSES, "Cache lookups that required a rebuild");
    describe_counter!(
        UPSTREAM_FALLBACKS,
        "Statistics served from the fallback table because upstream had no data"
    );
}

fn namespace(key: &CacheKey) -> &'static str {
    match key {
        CacheKey::Stats(_) => "stats",
        CacheKey::Trend(..) => "trend",
    }
}

pub fn record_cache_hit(key: &CacheKey) {
    counter!(CACHE_HITS, "namespace" => namespace(key)).increment(1);
}

pub fn record_cache_miss(key: &CacheKey) {
    counter!(CACHE_MISSES, "namespace" => namespace(key)).increment(1);
}

pub fn record_fallback(metric: Metric) {
    counter!(UPSTREAM_FALLBACKS, "metric" => metric.key()).increment(1);
}
