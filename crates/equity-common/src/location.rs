//! Supported locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EquityError;

/// Internal location identifier.
///
/// The set is closed: request paths are parsed into this enum before any
/// work happens, so an unknown key never reaches the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Global,
    Us,
    Uk,
    In,
    Se,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Global,
        Location::Us,
        Location::Uk,
        Location::In,
        Location::Se,
    ];

    /// Key used in URLs, cache keys and the catalog.
    pub fn key(&self) -> &'static str {
        match self {
            Location::Global => "global",
            Location::Us => "us",
            Location::Uk => "uk",
            Location::In => "in",
            Location::Se => "se",
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Location::Global)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Location {
    type Err = EquityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|l| l.key() == s)
            .ok_or_else(|| EquityError::UnknownLocation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_locations() {
        for location in Location::ALL {
            assert_eq!(location.key().parse::<Location>().unwrap(), location);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("US".parse::<Location>().is_err());
        assert!("".parse::<Location>().is_err());
        assert!("mars".parse::<Location>().is_err());
    }

    #[test]
    fn test_serde_uses_key() {
        assert_eq!(serde_json::to_string(&Location::Uk).unwrap(), "\"uk\"");
        let parsed: Location = serde_json::from_str("\"global\"").unwrap();
        assert!(parsed.is_global());
    }
}
