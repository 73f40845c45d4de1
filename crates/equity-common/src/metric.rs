//! Supported metrics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EquityError;

/// One of the five gender-equality metrics carried in every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PayGap,
    Leadership,
    Education,
    Workforce,
    MaternalHealth,
}

impl Metric {
    /// All metrics in display order (also CSV row order).
    pub const ALL: [Metric; 5] = [
        Metric::PayGap,
        Metric::Leadership,
        Metric::Education,
        Metric::Workforce,
        Metric::MaternalHealth,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::PayGap => "payGap",
            Metric::Leadership => "leadership",
            Metric::Education => "education",
            Metric::Workforce => "workforce",
            Metric::MaternalHealth => "maternalHealth",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = EquityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| EquityError::UnknownMetric(s.to_string()))
    }
}
