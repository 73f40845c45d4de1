//! Per-metric normalization of upstream observations into statistics.
//!
//! [`normalize`] is total: an upstream observation is transformed into a
//! display value and sentence, and anything else (no data, non-finite value)
//! resolves to the catalog's fallback entry for that metric and location.

use chrono::{DateTime, Utc};
use equity_common::{Catalog, Location, Metric, Statistic};
use indicator_client::{DateWindow, IndicatorQuery, IndicatorSource, Observation};
use tracing::{debug, instrument};

use crate::metrics;

/// Fetch the latest observation for `(metric, location)` and turn it into a
/// [`Statistic`], falling back to the catalog when upstream has nothing.
#[instrument(skip(source, catalog, now), fields(metric = %metric, location = %location))]
pub async fn normalize(
    source: &dyn IndicatorSource,
    catalog: &Catalog,
    now: DateTime<Utc>,
    metric: Metric,
    location: Location,
) -> Statistic {
    let metric_info = catalog.metric(metric);
    let location_info = catalog.location(location);
    let query = IndicatorQuery::new(
        location_info.code.as_str(),
        metric_info.indicator.as_str(),
        DateWindow::ending_now(now, metric_info.window_years),
    );

    match source.latest(&query).await {
        Some(observation) if observation.value.is_finite() => {
            from_observation(metric, &observation, &location_info.name, &metric_info.source)
        }
        _ => {
            debug!("No upstream observation, using fallback");
            metrics::record_fallback(metric);
            catalog.fallback(metric, location).clone()
        }
    }
}

/// Apply the metric transform and attach year and source.
pub fn from_observation(
    metric: Metric,
    observation: &Observation,
    location_name: &str,
    source: &str,
) -> Statistic {
    let mut stat = transform(metric, observation.value, location_name);
    if let Some(year) = observation.year() {
        stat = stat.with_year(year);
    }
    if !source.is_empty() {
        stat = stat.with_source(source);
    }
    stat
}

/// Display value and detail sentence for a raw indicator value.
pub fn transform(metric: Metric, raw: f64, location_name: &str) -> Statistic {
    match metric {
        Metric::PayGap => {
            // Female-to-male participation ratio; the gap is its complement.
            let ratio = round(raw);
            let gap = (100 - ratio).max(0);
            Statistic::new(
                format!("{}%", gap),
                format!(
                    "Women in {} participate in the labor force at {}% the rate of men",
                    location_name, ratio
                ),
            )
        }
        Metric::Leadership => {
            let share = round(raw);
            Statistic::new(
                format!("{}%", share),
                format!(
                    "Women hold {}% of seats in national parliaments in {}",
                    share, location_name
                ),
            )
        }
        Metric::Education => Statistic::new(
            format!("{:.2}", raw),
            format!(
                "Girls enrol in primary and secondary school at {:.2} times the rate of boys in {}",
                raw, location_name
            ),
        ),
        Metric::Workforce => {
            let share = round(raw);
            Statistic::new(
                format!("{}%", share),
                format!("Women make up {}% of the labor force in {}", share, location_name),
            )
        }
        Metric::MaternalHealth => {
            let rate = round(raw);
            Statistic::new(
                rate.to_string(),
                format!(
                    "{} maternal deaths per 100,000 live births in {}",
                    rate, location_name
                ),
            )
        }
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}
