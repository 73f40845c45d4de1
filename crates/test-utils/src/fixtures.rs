//! Common test fixtures.

use chrono::{DateTime, TimeZone, Utc};
use equity_common::{Metric, Snapshot, Statistic};
use indicator_client::RawPoint;

/// Midnight UTC on the given date.
pub fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// A statistic with every field populated.
pub fn statistic(value: &str, detail: &str) -> Statistic {
    Statistic::new(value, detail)
        .with_year("2022")
        .with_source("Test Bureau, Annual Survey")
}

/// Snapshot whose details contain commas and quotes, for export tests.
pub fn sample_snapshot(last_updated: DateTime<Utc>) -> Snapshot {
    Snapshot::from_fn(last_updated, |metric| match metric {
        Metric::PayGap => statistic("37%", "Women participate at 63% the rate of men, globally"),
        Metric::Leadership => statistic("27%", "Women hold 27% of \"seats\""),
        Metric::Education => Statistic::new("1.00", "Parity in enrolment"),
        Metric::Workforce => statistic("39%", "Women make up 39% of the labor force"),
        Metric::MaternalHealth => statistic("223", "223 deaths per 100,000 live births"),
    })
}

/// Upstream row helper for series fixtures.
pub fn raw_point(date: &str, value: Option<f64>, location_name: &str) -> RawPoint {
    RawPoint {
        date: date.to_string(),
        value,
        location_name: location_name.to_string(),
    }
}
