//! Tests for badge rasterization.

use equity_common::{Catalog, Location, Metric};
use renderer::png::DEFAULT_SCALE;
use renderer::{badge_svg, comparison_svg, svg_to_png, Column};
use test_utils::statistic;

// ============================================================================
// Helper functions
// ============================================================================

/// Width and height from the IHDR chunk.
fn png_dimensions(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(&png[12..16], b"IHDR");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_comparison_badge_rasterizes_at_scale() {
    let catalog = Catalog::builtin().unwrap();
    let left = statistic("37%", "global");
    let right = statistic("16%", "us");
    let svg = comparison_svg(
        catalog.metric(Metric::PayGap),
        Column {
            location: catalog.location(Location::Global),
            statistic: &left,
        },
        Column {
            location: catalog.location(Location::Us),
            statistic: &right,
        },
    );

    let png = svg_to_png(&svg, DEFAULT_SCALE).unwrap();
    assert_eq!(png_dimensions(&png), (800, 240));
}

#[test]
fn test_badge_rasterizes_at_unit_scale() {
    let catalog = Catalog::builtin().unwrap();
    let svg = badge_svg(
        catalog.metric(Metric::Education),
        catalog.location(Location::Uk),
        &statistic("1.01", r#"escaped <&> "text""#),
    );

    let png = svg_to_png(&svg, 1.0).unwrap();
    assert_eq!(png_dimensions(&png), (400, 120));
}
