//! The indicator source abstraction and its query/result types.

use async_trait::async_trait;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Inclusive range of years searched for observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start_year: i32,
    pub end_year: i32,
}

impl DateWindow {
    /// Window covering `years` years before `end_year` up to `end_year`.
    pub fn ending_at(end_year: i32, years: u32) -> Self {
        Self {
            start_year: end_year - years as i32,
            end_year,
        }
    }

    /// Window ending in the year of `now`.
    pub fn ending_now(now: chrono::DateTime<chrono::Utc>, years: u32) -> Self {
        Self::ending_at(now.year(), years)
    }

    /// Value for the upstream `date` query parameter.
    pub fn to_param(&self) -> String {
        format!("{}:{}", self.start_year, self.end_year)
    }
}

/// One upstream lookup: an indicator for a location within a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorQuery {
    pub location_code: String,
    pub indicator_code: String,
    pub window: DateWindow,
}

impl IndicatorQuery {
    pub fn new(
        location_code: impl Into<String>,
        indicator_code: impl Into<String>,
        window: DateWindow,
    ) -> Self {
        Self {
            location_code: location_code.into(),
            indicator_code: indicator_code.into(),
            window,
        }
    }
}

/// Most recent non-null observation of an indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub value: f64,
    /// Observation date as reported upstream (usually a year, e.g. "2022").
    pub date: String,
}

impl Observation {
    /// Four-digit year prefix of the date, if the date has one.
    pub fn year(&self) -> Option<&str> {
        let year = self.date.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }
}

/// One raw upstream row, nulls preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub date: String,
    pub value: Option<f64>,
    pub location_name: String,
}

/// Fail-soft access to upstream indicator data.
///
/// Implementations must swallow transport and parse failures: `latest`
/// returns `None` and `series` returns an empty vector.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Most recent non-null observation in the query window.
    async fn latest(&self, query: &IndicatorQuery) -> Option<Observation>;

    /// Every observation in the query window, in upstream order.
    async fn series(&self, query: &IndicatorQuery) -> Vec<RawPoint>;
}
