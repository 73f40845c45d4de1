//! Display-ready statistics and the records built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::metric::Metric;

/// A single formatted statistic for one (metric, location) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistic {
    /// Formatted value, e.g. "37%" or "1.02".
    pub value: String,
    /// Human-readable sentence describing the value.
    pub detail: String,
    /// Observation year, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Source attribution, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Statistic {
    pub fn new(value: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            detail: detail.into(),
            year: None,
            source: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// All statistics for one location as of one fetch cycle.
///
/// Each metric has its own field, so a snapshot can never be missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub pay_gap: Statistic,
    pub leadership: Statistic,
    pub education: Statistic,
    pub workforce: Statistic,
    pub maternal_health: Statistic,
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot by producing one statistic per metric.
    pub fn from_fn(last_updated: DateTime<Utc>, mut f: impl FnMut(Metric) -> Statistic) -> Self {
        Self {
            pay_gap: f(Metric::PayGap),
            leadership: f(Metric::Leadership),
            education: f(Metric::Education),
            workforce: f(Metric::Workforce),
            maternal_health: f(Metric::MaternalHealth),
            last_updated,
        }
    }

    pub fn get(&self, metric: Metric) -> &Statistic {
        match metric {
            Metric::PayGap => &self.pay_gap,
            Metric::Leadership => &self.leadership,
            Metric::Education => &self.education,
            Metric::Workforce => &self.workforce,
            Metric::MaternalHealth => &self.maternal_health,
        }
    }

    /// Statistics in `Metric::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &Statistic)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// One year of a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub year: i32,
    pub value: f64,
    pub location_name: String,
}

/// Yearly values of one metric for one location, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub metric_key: Metric,
    pub location_key: Location,
    pub points: Vec<TrendPoint>,
    pub indicator_code: String,
    pub last_updated: DateTime<Utc>,
}
