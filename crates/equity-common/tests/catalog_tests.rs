//! Tests for catalog loading and validation.

use equity_common::{Catalog, EquityError, Location, Metric};
use std::io::Write;

// ============================================================================
// Helper functions
// ============================================================================

const LOCATIONS: &str = r#"
locations:
  global: { code: WLD, name: the world, label: Global }
  us: { code: USA, name: the United States, label: United States }
  uk: { code: GBR, name: the United Kingdom, label: United Kingdom }
  in: { code: IND, name: India, label: India }
  se: { code: SWE, name: Sweden, label: Sweden }
"#;

/// Metric block with only a global fallback.
fn metric_block(key: &str, color: &str) -> String {
    format!(
        r##"
  {key}:
    indicator: IND.{key}
    window_years: 5
    title: Title {key}
    color: "{color}"
    source: Test source
    fallback:
      global:
        value: "1%"
        detail: "global {key}"
"##
    )
}

fn catalog_yaml(skip: Option<&str>) -> String {
    let mut yaml = String::from(LOCATIONS);
    yaml.push_str("metrics:\n");
    for metric in Metric::ALL {
        if Some(metric.key()) != skip {
            yaml.push_str(&metric_block(metric.key(), "#123456"));
        }
    }
    yaml
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_minimal_catalog_loads() {
    let catalog = Catalog::from_yaml(&catalog_yaml(None)).unwrap();
    assert_eq!(catalog.metric(Metric::Education).indicator, "IND.education");
    assert_eq!(catalog.location(Location::Se).name, "Sweden");
}

#[test]
fn test_missing_location_entry_uses_global_fallback() {
    let catalog = Catalog::from_yaml(&catalog_yaml(None)).unwrap();
    let stat = catalog.fallback(Metric::PayGap, Location::In);
    assert_eq!(stat.detail, "global payGap");
    assert!(!catalog.metric(Metric::PayGap).fallback.has_entry(Location::In));
    assert!(catalog.metric(Metric::PayGap).fallback.has_entry(Location::Global));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(catalog_yaml(None).as_bytes()).unwrap();

    let catalog = Catalog::load(Some(file.path())).unwrap();
    assert_eq!(catalog.metric(Metric::Leadership).title, "Title leadership");
}

#[test]
fn test_load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::load_from_file(dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, EquityError::CatalogRead(_)));
}

// ============================================================================
// Validation failures
// ============================================================================

#[test]
fn test_missing_metric_is_rejected() {
    let err = Catalog::from_yaml(&catalog_yaml(Some("workforce"))).unwrap_err();
    assert!(matches!(err, EquityError::InvalidCatalog(ref m) if m.contains("workforce")));
}

#[test]
fn test_missing_global_fallback_is_rejected() {
    let yaml = catalog_yaml(None).replace(
        "      global:\n        value: \"1%\"\n        detail: \"global leadership\"",
        "      us:\n        value: \"1%\"\n        detail: \"us leadership\"",
    );
    let err = Catalog::from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, EquityError::InvalidCatalog(ref m) if m.contains("global fallback")));
}

#[test]
fn test_unknown_metric_key_is_rejected() {
    let mut yaml = catalog_yaml(None);
    yaml.push_str(&metric_block("bogus", "#000"));
    let err = Catalog::from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, EquityError::InvalidCatalog(ref m) if m.contains("bogus")));
}

#[test]
fn test_duplicate_upstream_code_is_rejected() {
    let yaml = catalog_yaml(None).replace("code: SWE", "code: USA");
    let err = Catalog::from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, EquityError::InvalidCatalog(ref m) if m.contains("USA")));
}

#[test]
fn test_invalid_color_is_rejected() {
    let yaml = catalog_yaml(None).replacen("#123456", "red", 1);
    let err = Catalog::from_yaml(&yaml).unwrap_err();
    assert!(matches!(err, EquityError::InvalidCatalog(ref m) if m.contains("color")));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = Catalog::from_yaml("locations: [").unwrap_err();
    assert!(matches!(err, EquityError::CatalogParse(_)));
}
