//! Scripted indicator source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use indicator_client::{IndicatorQuery, IndicatorSource, Observation, RawPoint};

type Key = (String, String);

/// [`IndicatorSource`] returning canned data keyed by
/// (location code, indicator code). Unscripted lookups report no data, which
/// is exactly what the real client does on upstream failure.
#[derive(Debug, Default)]
pub struct StubSource {
    latest: Mutex<HashMap<Key, Observation>>,
    series: Mutex<HashMap<Key, Vec<RawPoint>>>,
    queries: Mutex<Vec<IndicatorQuery>>,
    latest_calls: AtomicUsize,
    series_calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every lookup, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_latest(&self, location_code: &str, indicator_code: &str, value: f64, date: &str) {
        self.latest.lock().unwrap().insert(
            key(location_code, indicator_code),
            Observation {
                value,
                date: date.to_string(),
            },
        );
    }

    pub fn set_series(&self, location_code: &str, indicator_code: &str, points: Vec<RawPoint>) {
        self.series
            .lock()
            .unwrap()
            .insert(key(location_code, indicator_code), points);
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.latest_calls() + self.series_calls()
    }

    /// Every query received so far, in arrival order.
    pub fn queries(&self) -> Vec<IndicatorQuery> {
        self.queries.lock().unwrap().clone()
    }

    async fn record(&self, query: &IndicatorQuery) {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn key(location_code: &str, indicator_code: &str) -> Key {
    (location_code.to_string(), indicator_code.to_string())
}

#[async_trait]
impl IndicatorSource for StubSource {
    async fn latest(&self, query: &IndicatorQuery) -> Option<Observation> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.record(query).await;
        self.latest
            .lock()
            .unwrap()
            .get(&key(&query.location_code, &query.indicator_code))
            .cloned()
    }

    async fn series(&self, query: &IndicatorQuery) -> Vec<RawPoint> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.record(query).await;
        self.series
            .lock()
            .unwrap()
            .get(&key(&query.location_code, &query.indicator_code))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicator_client::DateWindow;

    #[test]
    fn test_unscripted_lookup_is_no_data() {
        let source = StubSource::new();
        let query = IndicatorQuery::new("USA", "X", DateWindow::ending_at(2024, 5));
        tokio_test::block_on(async {
            assert!(source.latest(&query).await.is_none());
            assert!(source.series(&query).await.is_empty());
        });
        assert_eq!(source.total_calls(), 2);
    }

    #[test]
    fn test_delay_is_applied() {
        let source = StubSource::new().with_delay(Duration::from_millis(20));
        let query = IndicatorQuery::new("USA", "X", DateWindow::ending_at(2024, 5));
        let start = std::time::Instant::now();
        tokio_test::block_on(source.latest(&query));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_scripted_lookup() {
        let source = StubSource::new();
        source.set_latest("USA", "X", 42.0, "2023");
        let query = IndicatorQuery::new("USA", "X", DateWindow::ending_at(2024, 5));
        assert_eq!(source.latest(&query).await.unwrap().value, 42.0);
        assert_eq!(source.queries(), vec![query]);
    }
}
