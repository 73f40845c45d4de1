//! Indicator catalog: upstream codes, date windows, styling and fallbacks.
//!
//! The catalog is static configuration loaded once at startup. It is parsed
//! from YAML (the built-in `catalog.yaml` or an operator-supplied file) and
//! validated so that every [`Location`] has exactly one upstream code and
//! every [`Metric`] has exactly one indicator plus a fallback table with a
//! `global` entry. After validation all lookups are total.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::error::{EquityError, EquityResult};
use crate::location::Location;
use crate::metric::Metric;
use crate::statistic::Statistic;

const BUILTIN_CATALOG: &str = include_str!("../catalog.yaml");

/// Upstream mapping and display names for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Upstream country/aggregate code (e.g. "WLD", "USA").
    pub code: String,
    /// Name used inside sentences (e.g. "the United States").
    pub name: String,
    /// Short label used in badge columns (e.g. "United States").
    pub label: String,
}

/// Per-location backstop statistics for one metric.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    default: Statistic,
    by_location: HashMap<Location, Statistic>,
}

impl FallbackTable {
    /// Fallback for a location, or the global entry when it has none.
    pub fn lookup(&self, location: Location) -> &Statistic {
        self.by_location.get(&location).unwrap_or(&self.default)
    }

    /// Whether the location has its own entry.
    pub fn has_entry(&self, location: Location) -> bool {
        location.is_global() || self.by_location.contains_key(&location)
    }
}

/// Configuration for one metric.
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Upstream indicator code.
    pub indicator: String,
    /// Number of years before the current one searched for observations.
    pub window_years: u32,
    pub title: String,
    /// Badge accent color as a hex string.
    pub color: String,
    /// Attribution attached to freshly fetched statistics.
    pub source: String,
    pub fallback: FallbackTable,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    locations: BTreeMap<String, LocationInfo>,
    metrics: BTreeMap<String, MetricFile>,
}

#[derive(Debug, Deserialize)]
struct MetricFile {
    indicator: String,
    window_years: u32,
    title: String,
    color: String,
    source: String,
    #[serde(default)]
    fallback: BTreeMap<String, Statistic>,
}

/// Validated indicator catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    // Both maps contain every enum variant; enforced by `from_yaml`.
    locations: HashMap<Location, LocationInfo>,
    metrics: HashMap<Metric, MetricInfo>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> EquityResult<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a catalog file, replacing the built-in one entirely.
    pub fn load_from_file(path: impl AsRef<Path>) -> EquityResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), "Loaded indicator catalog");
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise use the built-in catalog.
    pub fn load(path: Option<&Path>) -> EquityResult<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::builtin(),
        }
    }

    /// Parse and validate catalog YAML.
    pub fn from_yaml(content: &str) -> EquityResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;

        let mut locations = HashMap::new();
        let mut seen_codes = HashSet::new();
        for (key, info) in file.locations {
            let location: Location = key
                .parse()
                .map_err(|_| invalid(format!("unknown location key '{}'", key)))?;
            if info.code.trim().is_empty() {
                return Err(invalid(format!("location '{}' has an empty code", key)));
            }
            if !seen_codes.insert(info.code.clone()) {
                return Err(invalid(format!(
                    "upstream code '{}' is mapped by more than one location",
                    info.code
                )));
            }
            locations.insert(location, info);
        }
        for location in Location::ALL {
            if !locations.contains_key(&location) {
                return Err(invalid(format!("missing location '{}'", location)));
            }
        }

        let mut metrics = HashMap::new();
        for (key, raw) in file.metrics {
            let metric: Metric = key
                .parse()
                .map_err(|_| invalid(format!("unknown metric key '{}'", key)))?;
            metrics.insert(metric, validate_metric(metric, raw)?);
        }
        for metric in Metric::ALL {
            if !metrics.contains_key(&metric) {
                return Err(invalid(format!("missing metric '{}'", metric)));
            }
        }

        Ok(Self { locations, metrics })
    }

    pub fn location(&self, location: Location) -> &LocationInfo {
        &self.locations[&location]
    }

    pub fn metric(&self, metric: Metric) -> &MetricInfo {
        &self.metrics[&metric]
    }

    /// Fallback statistic for a (metric, location) pair. Never absent.
    pub fn fallback(&self, metric: Metric, location: Location) -> &Statistic {
        self.metric(metric).fallback.lookup(location)
    }
}

fn validate_metric(metric: Metric, raw: MetricFile) -> EquityResult<MetricInfo> {
    if raw.indicator.trim().is_empty() {
        return Err(invalid(format!("metric '{}' has an empty indicator", metric)));
    }
    if raw.window_years == 0 {
        return Err(invalid(format!("metric '{}' has a zero date window", metric)));
    }
    if !is_hex_color(&raw.color) {
        return Err(invalid(format!(
            "metric '{}' has invalid color '{}'",
            metric, raw.color
        )));
    }

    let mut by_location = HashMap::new();
    for (key, stat) in raw.fallback {
        let location: Location = key.parse().map_err(|_| {
            invalid(format!("metric '{}' has fallback for unknown location '{}'", metric, key))
        })?;
        if stat.value.is_empty() || stat.detail.is_empty() {
            return Err(invalid(format!(
                "metric '{}' fallback for '{}' needs a value and detail",
                metric, key
            )));
        }
        by_location.insert(location, stat);
    }
    let default = by_location
        .remove(&Location::Global)
        .ok_or_else(|| invalid(format!("metric '{}' has no global fallback", metric)))?;

    Ok(MetricInfo {
        indicator: raw.indicator,
        window_years: raw.window_years,
        title: raw.title,
        color: raw.color,
        source: raw.source,
        fallback: FallbackTable {
            default,
            by_location,
        },
    })
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn invalid(msg: String) -> EquityError {
    EquityError::InvalidCatalog(msg)
}
