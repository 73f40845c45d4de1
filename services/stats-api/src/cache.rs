//! In-memory freshness cache for snapshots and trend series.
//!
//! Every endpoint goes through this cache before doing upstream work, and all
//! representations of a location (JSON, CSV, SVG, PNG, share card) are
//! rendered from the same cached `Arc<Snapshot>`, so within one freshness
//! window they always agree on values and `lastUpdated`.
//!
//! ## Cache Key Structure
//! Keys are namespaced by purpose: `stats:<location>` and
//! `trend:<metric>:<location>`. The key space is finite, so there is no
//! eviction; stale entries are overwritten in place on the next access.
//!
//! ## Concurrent misses
//! [`FreshnessCache::get_or_insert_with`] serializes builders per key. A
//! request that waited on another request's build re-checks the cache and
//! reuses that result instead of fetching again.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use equity_common::{Clock, Location, Metric, Snapshot, TrendSeries};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::metrics;

/// Default freshness window: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Namespaced cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Stats(Location),
    Trend(Metric, Location),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Stats(location) => write!(f, "stats:{}", location),
            CacheKey::Trend(metric, location) => write!(f, "trend:{}:{}", metric, location),
        }
    }
}

/// Cached value.
#[derive(Debug, Clone)]
pub enum CachePayload {
    Snapshot(Arc<Snapshot>),
    Trend(Arc<TrendSeries>),
}

/// A payload and the time it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: CachePayload,
    pub stored_at: DateTime<Utc>,
}

/// Counters for the cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Fresh entry found on first lookup.
    pub hits: AtomicU64,
    /// No fresh entry on first lookup.
    pub misses: AtomicU64,
    /// Entries written.
    pub writes: AtomicU64,
    /// Misses satisfied by another request's concurrent build.
    pub coalesced: AtomicU64,
}

/// Point-in-time view of [`CacheStats`].
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub coalesced: u64,
    pub ttl_secs: u64,
    pub hit_rate: f64,
}

/// Process-wide keyed store with time-boxed validity.
pub struct FreshnessCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    // One gate per key ever built; bounded by the key space.
    in_flight: StdMutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl FreshnessCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        tracing::info!(ttl_secs = ttl.as_secs(), "Initializing freshness cache");
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: StdMutex::new(HashMap::new()),
            ttl,
            clock,
            stats: CacheStats::default(),
        }
    }

    /// Entry for `key`, fresh or stale.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store `payload` under `key` stamped with the current time, replacing
    /// any previous entry.
    pub async fn put(&self, key: CacheKey, payload: CachePayload) -> CacheEntry {
        let entry = CacheEntry {
            payload,
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(key, entry.clone());
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "Cache entry stored");
        entry
    }

    /// Whether `entry` is younger than the freshness window.
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        let age = self.clock.now() - entry.stored_at;
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => age < ttl,
            // A TTL too large for chrono never expires.
            Err(_) => true,
        }
    }

    /// Entry for `key` only if it is fresh. Counts a hit or a miss.
    pub async fn get_fresh(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.lookup_fresh(key).await {
            Some(entry) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_hit(key);
                Some(entry)
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_miss(key);
                None
            }
        }
    }

    /// Fresh entry for `key`, building and storing one on a miss.
    ///
    /// At most one `build` runs per key at a time; callers that queued behind
    /// a build receive its result.
    pub async fn get_or_insert_with<F, Fut>(&self, key: CacheKey, build: F) -> CacheEntry
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachePayload>,
    {
        if let Some(entry) = self.get_fresh(&key).await {
            return entry;
        }

        let gate = self.gate(key);
        let _guard = gate.lock().await;

        // Filled while we waited for the gate.
        if let Some(entry) = self.lookup_fresh(&key).await {
            self.stats.coalesced.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Reusing concurrently built entry");
            return entry;
        }

        let payload = build().await;
        self.put(key, payload).await
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry. The next request for each key refetches.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        tracing::info!(count, "Freshness cache cleared");
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub async fn stats_snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.stats.hits.load(Ordering::Relaxed);
        let misses = self.stats.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStatsSnapshot {
            entries: self.len().await,
            hits,
            misses,
            writes: self.stats.writes.load(Ordering::Relaxed),
            coalesced: self.stats.coalesced.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
            hit_rate: if total == 0 {
                0.0
            } else {
                (hits as f64 / total as f64) * 100.0
            },
        }
    }

    async fn lookup_fresh(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.get(key).await.filter(|entry| self.is_valid(entry))
    }

    fn gate(&self, key: CacheKey) -> Arc<Mutex<()>> {
        let mut gates = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(gates.entry(key).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equity_common::{Snapshot, Statistic};
    use std::sync::atomic::AtomicUsize;
    use test_utils::{timestamp, ManualClock};

    fn snapshot(marker: &str) -> CachePayload {
        CachePayload::Snapshot(Arc::new(Snapshot::from_fn(timestamp(2024, 1, 1), |_| {
            Statistic::new(marker, marker)
        })))
    }

    fn value_of(entry: &CacheEntry) -> String {
        match &entry.payload {
            CachePayload::Snapshot(s) => s.pay_gap.value.clone(),
            CachePayload::Trend(_) => panic!("expected snapshot"),
        }
    }

    fn cache() -> (Arc<ManualClock>, FreshnessCache) {
        let clock = Arc::new(ManualClock::new(timestamp(2024, 1, 1)));
        let cache = FreshnessCache::new(DEFAULT_TTL, clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_key_namespaces() {
        assert_eq!(CacheKey::Stats(Location::Us).to_string(), "stats:us");
        assert_eq!(
            CacheKey::Trend(Metric::PayGap, Location::Us).to_string(),
            "trend:payGap:us"
        );
        assert_ne!(
            CacheKey::Stats(Location::Us),
            CacheKey::Trend(Metric::PayGap, Location::Us)
        );
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (_, cache) = cache();
        let key = CacheKey::Stats(Location::Uk);
        assert!(cache.get(&key).await.is_none());

        cache.put(key, snapshot("a")).await;
        let entry = cache.get(&key).await.unwrap();
        assert_eq!(value_of(&entry), "a");
        assert_eq!(entry.stored_at, timestamp(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let (clock, cache) = cache();
        let key = CacheKey::Stats(Location::Uk);
        let entry = cache.put(key, snapshot("a")).await;

        clock.advance(chrono::Duration::hours(23) + chrono::Duration::minutes(59));
        assert!(cache.is_valid(&entry));

        clock.advance(chrono::Duration::minutes(1));
        assert!(!cache.is_valid(&entry));
        assert!(cache.get_fresh(&key).await.is_none());
        // Stale entries are kept until overwritten
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (_, cache) = cache();
        let key = CacheKey::Stats(Location::Se);
        cache.put(key, snapshot("first")).await;
        cache.put(key, snapshot("second")).await;
        assert_eq!(value_of(&cache.get(&key).await.unwrap()), "second");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_insert_builds_once_per_window() {
        let (clock, cache) = cache();
        let key = CacheKey::Stats(Location::In);
        let counter = AtomicUsize::new(0);
        let builds = &counter;
        let build = || async move {
            builds.fetch_add(1, Ordering::SeqCst);
            snapshot("built")
        };

        cache.get_or_insert_with(key, build).await;
        cache.get_or_insert_with(key, build).await;
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        clock.advance(chrono::Duration::hours(25));
        cache.get_or_insert_with(key, build).await;
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_build_once() {
        let (_, cache) = cache();
        let cache = Arc::new(cache);
        let builds = Arc::new(AtomicUsize::new(0));
        let key = CacheKey::Stats(Location::Global);

        let mut handles = vec![];
        for _ in 0..8 {
            let cache = cache.clone();
            let builds = builds.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_insert_with(key, || async move {
                        builds.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        snapshot("shared")
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(value_of(&handle.await.unwrap()), "shared");
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().writes.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let (_, cache) = cache();
        let key = CacheKey::Stats(Location::Us);

        cache.get_fresh(&key).await;
        cache.put(key, snapshot("x")).await;
        cache.get_fresh(&key).await;

        let stats = cache.stats_snapshot().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
