//! Parsing of upstream indicator responses.
//!
//! A successful response is a two-element JSON array: paging metadata
//! followed by an array of observations (or `null` when there is no data).
//! Errors come back as a one-element array holding a `message` list.

use serde::Deserialize;
use serde_json::Value;

use crate::client::FetchError;
use crate::source::{Observation, RawPoint};

#[derive(Debug, Deserialize)]
struct ApiObservation {
    value: Option<f64>,
    date: String,
    #[serde(default)]
    country: Option<ApiCountry>,
}

#[derive(Debug, Deserialize)]
struct ApiCountry {
    value: String,
}

/// Parse a response body into raw rows, nulls preserved.
pub fn parse_points(body: &str) -> Result<Vec<RawPoint>, FetchError> {
    let root: Value = serde_json::from_str(body)?;
    let Value::Array(mut parts) = root else {
        return Err(FetchError::UnexpectedShape("response is not an array".into()));
    };

    if parts.len() < 2 {
        return Err(upstream_message(parts.first()));
    }

    let rows = parts.swap_remove(1);
    if rows.is_null() {
        return Ok(Vec::new());
    }

    let rows: Vec<ApiObservation> = serde_json::from_value(rows)?;
    Ok(rows
        .into_iter()
        .map(|row| RawPoint {
            date: row.date,
            value: row.value,
            location_name: row.country.map(|c| c.value).unwrap_or_default(),
        })
        .collect())
}

/// Pick the most recent non-null observation.
pub fn latest_observation(points: &[RawPoint]) -> Option<Observation> {
    points
        .iter()
        .filter_map(|p| p.value.map(|v| (p, v)))
        .filter(|(_, v)| v.is_finite())
        .max_by(|(a, _), (b, _)| a.date.cmp(&b.date))
        .map(|(p, value)| Observation {
            value,
            date: p.date.clone(),
        })
}

fn upstream_message(meta: Option<&Value>) -> FetchError {
    let message = meta
        .and_then(|m| m.get("message"))
        .and_then(|m| m.get(0))
        .and_then(|m| m.get("value"))
        .and_then(Value::as_str)
        .unwrap_or("response has no data element");
    FetchError::Upstream(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"page":1,"pages":1,"per_page":50,"total":3},
        [
            {"indicator":{"id":"SG.GEN.PARL.ZS","value":"x"},"country":{"id":"US","value":"United States"},"date":"2023","value":29.0},
            {"indicator":{"id":"SG.GEN.PARL.ZS","value":"x"},"country":{"id":"US","value":"United States"},"date":"2022","value":null},
            {"indicator":{"id":"SG.GEN.PARL.ZS","value":"x"},"country":{"id":"US","value":"United States"},"date":"2021","value":27.3}
        ]
    ]"#;

    #[test]
    fn test_parse_points_preserves_nulls() {
        let points = parse_points(SAMPLE).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].value, None);
        assert_eq!(points[0].location_name, "United States");
    }

    #[test]
    fn test_latest_skips_nulls() {
        let points = parse_points(SAMPLE).unwrap();
        let latest = latest_observation(&points).unwrap();
        assert_eq!(latest.date, "2023");
        assert_eq!(latest.value, 29.0);
    }

    #[test]
    fn test_latest_of_all_nulls_is_none() {
        let points = vec![RawPoint {
            date: "2020".into(),
            value: None,
            location_name: "World".into(),
        }];
        assert!(latest_observation(&points).is_none());
    }

    #[test]
    fn test_null_rows_element_is_empty() {
        let body = r#"[{"page":0,"pages":0,"per_page":50,"total":0}, null]"#;
        assert!(parse_points(body).unwrap().is_empty());
    }

    #[test]
    fn test_error_message_response() {
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        let err = parse_points(body).unwrap_err();
        assert!(matches!(err, FetchError::Upstream(ref m) if m.contains("not valid")));
    }

    #[test]
    fn test_non_array_is_rejected() {
        assert!(matches!(
            parse_points(r#"{"oops":true}"#),
            Err(FetchError::UnexpectedShape(_))
        ));
        assert!(matches!(parse_points("not json"), Err(FetchError::Parse(_))));
    }
}
