//! Aggregate statistics: cached snapshots and trend series.
//!
//! [`StatsService`] is the single entry point the handlers use. It owns the
//! upstream source and the freshness cache, and guarantees that every
//! representation of a location is rendered from the same cached snapshot
//! within a freshness window.

use std::sync::Arc;

use equity_common::{
    Catalog, Clock, EquityError, EquityResult, Location, Metric, Snapshot, Statistic, TrendPoint,
    TrendSeries,
};
use indicator_client::{DateWindow, IndicatorQuery, IndicatorSource, RawPoint};
use tracing::{info, instrument};

use crate::cache::{CacheKey, CachePayload, FreshnessCache};
use crate::statistics;

/// Default number of years covered by a trend series.
pub const DEFAULT_TREND_YEARS: u32 = 15;

pub struct StatsService {
    catalog: Arc<Catalog>,
    source: Arc<dyn IndicatorSource>,
    cache: Arc<FreshnessCache>,
    clock: Arc<dyn Clock>,
    trend_years: u32,
}

impl StatsService {
    pub fn new(
        catalog: Arc<Catalog>,
        source: Arc<dyn IndicatorSource>,
        cache: Arc<FreshnessCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            source,
            cache,
            clock,
            trend_years: DEFAULT_TREND_YEARS,
        }
    }

    pub fn with_trend_years(mut self, years: u32) -> Self {
        self.trend_years = years.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cache(&self) -> &FreshnessCache {
        &self.cache
    }

    /// Cached snapshot for `location`, rebuilt when missing or stale.
    pub async fn snapshot(&self, location: Location) -> EquityResult<Arc<Snapshot>> {
        let entry = self
            .cache
            .get_or_insert_with(CacheKey::Stats(location), || async move {
                CachePayload::Snapshot(Arc::new(self.build_snapshot(location).await))
            })
            .await;

        match entry.payload {
            CachePayload::Snapshot(snapshot) => Ok(snapshot),
            CachePayload::Trend(_) => Err(EquityError::InternalError(format!(
                "cache entry for {} holds a trend series",
                CacheKey::Stats(location)
            ))),
        }
    }

    /// Build a fresh snapshot, running all metric normalizers concurrently.
    /// Does not touch the cache.
    #[instrument(skip(self), fields(location = %location))]
    pub async fn build_snapshot(&self, location: Location) -> Snapshot {
        let now = self.clock.now();
        let source = self.source.as_ref();
        let catalog = self.catalog.as_ref();

        let (pay_gap, leadership, education, workforce, maternal_health) = tokio::join!(
            statistics::normalize(source, catalog, now, Metric::PayGap, location),
            statistics::normalize(source, catalog, now, Metric::Leadership, location),
            statistics::normalize(source, catalog, now, Metric::Education, location),
            statistics::normalize(source, catalog, now, Metric::Workforce, location),
            statistics::normalize(source, catalog, now, Metric::MaternalHealth, location),
        );

        info!("Built statistics snapshot");
        Snapshot {
            pay_gap,
            leadership,
            education,
            workforce,
            maternal_health,
            last_updated: self.clock.now(),
        }
    }

    /// Build and install a snapshot regardless of the cached one's age.
    pub async fn refresh_snapshot(&self, location: Location) -> Arc<Snapshot> {
        let snapshot = Arc::new(self.build_snapshot(location).await);
        self.cache
            .put(
                CacheKey::Stats(location),
                CachePayload::Snapshot(snapshot.clone()),
            )
            .await;
        snapshot
    }

    /// One metric's statistic out of the cached snapshot.
    pub async fn statistic(&self, metric: Metric, location: Location) -> EquityResult<Statistic> {
        Ok(self.snapshot(location).await?.get(metric).clone())
    }

    /// Cached trend series for `(metric, location)`.
    pub async fn trend(&self, metric: Metric, location: Location) -> EquityResult<Arc<TrendSeries>> {
        let key = CacheKey::Trend(metric, location);
        let entry = self
            .cache
            .get_or_insert_with(key, || async move {
                CachePayload::Trend(Arc::new(self.build_trend(metric, location).await))
            })
            .await;

        match entry.payload {
            CachePayload::Trend(series) => Ok(series),
            CachePayload::Snapshot(_) => Err(EquityError::InternalError(format!(
                "cache entry for {} holds a snapshot",
                key
            ))),
        }
    }

    /// Fetch and order a trend series. Does not touch the cache.
    #[instrument(skip(self), fields(metric = %metric, location = %location))]
    pub async fn build_trend(&self, metric: Metric, location: Location) -> TrendSeries {
        let metric_info = self.catalog.metric(metric);
        let location_info = self.catalog.location(location);
        let now = self.clock.now();
        let query = IndicatorQuery::new(
            location_info.code.as_str(),
            metric_info.indicator.as_str(),
            DateWindow::ending_now(now, self.trend_years),
        );

        let raw = self.source.series(&query).await;
        let points = trend_points(raw, &location_info.label);
        info!(points = points.len(), "Built trend series");

        TrendSeries {
            metric_key: metric,
            location_key: location,
            points,
            indicator_code: metric_info.indicator.clone(),
            last_updated: now,
        }
    }
}

/// Drop null or undated rows and order the rest by ascending year.
pub fn trend_points(raw: Vec<RawPoint>, default_name: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = raw
        .into_iter()
        .filter_map(|point| {
            let value = point.value.filter(|v| v.is_finite())?;
            let year = point.date.get(..4)?.parse::<i32>().ok()?;
            let location_name = if point.location_name.is_empty() {
                default_name.to_string()
            } else {
                point.location_name
            };
            Some(TrendPoint {
                year,
                value,
                location_name,
            })
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TTL;
    use test_utils::{raw_point, timestamp, ManualClock, StubSource};

    fn service(source: Arc<StubSource>) -> (Arc<ManualClock>, StatsService) {
        let clock = Arc::new(ManualClock::new(timestamp(2024, 5, 1)));
        let cache = Arc::new(FreshnessCache::new(DEFAULT_TTL, clock.clone()));
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let service = StatsService::new(catalog, source, cache, clock.clone());
        (clock, service)
    }

    #[test]
    fn test_trend_points_sorted_and_nulls_dropped() {
        let raw = vec![
            raw_point("2021", Some(30.0), "Sweden"),
            raw_point("2019", Some(28.0), "Sweden"),
            raw_point("2020", None, "Sweden"),
            raw_point("2022", Some(31.5), ""),
            raw_point("bad", Some(1.0), "Sweden"),
        ];
        let points = trend_points(raw, "Fallback Name");
        let years: Vec<i32> = points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2021, 2022]);
        assert_eq!(points[2].location_name, "Fallback Name");
    }

    #[tokio::test]
    async fn test_snapshot_uses_one_lookup_per_metric() {
        let source = Arc::new(StubSource::new());
        source.set_latest("GBR", "SG.GEN.PARL.ZS", 34.6, "2023");
        let (_, service) = service(source.clone());

        let snapshot = service.snapshot(Location::Uk).await.unwrap();
        assert_eq!(snapshot.leadership.value, "35%");
        assert_eq!(snapshot.last_updated, timestamp(2024, 5, 1));
        assert_eq!(source.latest_calls(), Metric::ALL.len());
    }

    #[tokio::test]
    async fn test_snapshot_is_shared_within_window() {
        let source = Arc::new(StubSource::new());
        let (clock, service) = service(source.clone());

        let first = service.snapshot(Location::Us).await.unwrap();
        clock.advance(chrono::Duration::hours(1));
        let second = service.snapshot(Location::Us).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.latest_calls(), 5);

        clock.advance(chrono::Duration::hours(24));
        let third = service.snapshot(Location::Us).await.unwrap();
        assert!(third.last_updated > first.last_updated);
        assert_eq!(source.latest_calls(), 10);
    }

    #[tokio::test]
    async fn test_refresh_replaces_cached_snapshot() {
        let source = Arc::new(StubSource::new());
        let (clock, service) = service(source.clone());

        let first = service.snapshot(Location::Se).await.unwrap();
        clock.advance(chrono::Duration::minutes(5));
        let refreshed = service.refresh_snapshot(Location::Se).await;
        let cached = service.snapshot(Location::Se).await.unwrap();
        assert!(Arc::ptr_eq(&refreshed, &cached));
        assert_ne!(first.last_updated, cached.last_updated);
    }

    #[tokio::test]
    async fn test_trend_is_cached_separately() {
        let source = Arc::new(StubSource::new());
        source.set_series(
            "IND",
            "SL.TLF.TOTL.FL.ZS",
            vec![raw_point("2020", Some(20.0), "India")],
        );
        let (_, service) = service(source.clone());

        service.snapshot(Location::In).await.unwrap();
        let trend = service.trend(Metric::Workforce, Location::In).await.unwrap();
        service.trend(Metric::Workforce, Location::In).await.unwrap();

        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.indicator_code, "SL.TLF.TOTL.FL.ZS");
        assert_eq!(source.series_calls(), 1);
        assert_eq!(service.cache().len().await, 2);
    }
}
