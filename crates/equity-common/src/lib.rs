//! Common types and utilities for the gender-equality statistics services.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod location;
pub mod metric;
pub mod statistic;

pub use catalog::{Catalog, FallbackTable, LocationInfo, MetricInfo};
pub use clock::{Clock, SystemClock};
pub use error::{EquityError, EquityResult};
pub use location::Location;
pub use metric::Metric;
pub use statistic::{Snapshot, Statistic, TrendPoint, TrendSeries};
