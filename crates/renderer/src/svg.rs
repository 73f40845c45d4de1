//! SVG badges and share cards.
//!
//! All text taken from statistics or configuration passes through
//! [`prepare`] before it is interpolated. Colors are
//! validated hex strings from the catalog and are inserted as-is.

use std::fmt::Write;

use equity_common::{LocationInfo, MetricInfo, Statistic};

use crate::escape::prepare;

pub const BADGE_WIDTH: u32 = 400;
pub const BADGE_HEIGHT: u32 = 120;
pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;

const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";

// Character budgets for single-line text at each size.
const BADGE_TITLE_CHARS: usize = 40;
const BADGE_VALUE_CHARS: usize = 12;
const BADGE_DETAIL_CHARS: usize = 64;
const COLUMN_LABEL_CHARS: usize = 20;
const CARD_TITLE_CHARS: usize = 40;
const CARD_DETAIL_CHARS: usize = 90;
const CARD_SOURCE_CHARS: usize = 80;

/// One side of a comparison badge.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub location: &'a LocationInfo,
    pub statistic: &'a Statistic,
}

fn open_svg(out: &mut String, width: u32, height: u32, label: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}">"#,
        w = width,
        h = height,
        label = label,
    );
}

fn text(out: &mut String, x: u32, y: u32, size: u32, weight: u32, fill: &str, content: &str) {
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-family="{FONT_FAMILY}" font-size="{size}" font-weight="{weight}" fill="{fill}">{content}</text>"#,
    );
}

/// Single-location badge for one metric.
pub fn badge_svg(metric: &MetricInfo, location: &LocationInfo, stat: &Statistic) -> String {
    let title = prepare(&format!("{} · {}", metric.title, location.label), BADGE_TITLE_CHARS);
    let value = prepare(&stat.value, BADGE_VALUE_CHARS);
    let detail = prepare(&stat.detail, BADGE_DETAIL_CHARS);
    let label = prepare(&format!("{}: {}", metric.title, stat.value), 80);

    let mut out = String::with_capacity(1024);
    open_svg(&mut out, BADGE_WIDTH, BADGE_HEIGHT, &label);
    let _ = write!(
        out,
        r##"<rect x="1" y="1" width="398" height="118" rx="12" fill="#ffffff" stroke="{c}" stroke-width="2"/><rect x="1" y="1" width="8" height="118" rx="4" fill="{c}"/>"##,
        c = metric.color,
    );
    text(&mut out, 24, 32, 14, 600, "#374151", &title);
    text(&mut out, 24, 74, 36, 700, &metric.color, &value);
    text(&mut out, 24, 102, 11, 400, "#6b7280", &detail);
    out.push_str("</svg>");
    out
}

/// Two-column badge comparing one metric across two locations.
pub fn comparison_svg(metric: &MetricInfo, left: Column<'_>, right: Column<'_>) -> String {
    let title = prepare(&metric.title, BADGE_TITLE_CHARS);
    let label = prepare(
        &format!(
            "{}: {} {} vs {} {}",
            metric.title,
            left.location.label,
            left.statistic.value,
            right.location.label,
            right.statistic.value
        ),
        120,
    );

    let mut out = String::with_capacity(1536);
    open_svg(&mut out, BADGE_WIDTH, BADGE_HEIGHT, &label);
    let _ = write!(
        out,
        r##"<rect x="1" y="1" width="398" height="118" rx="12" fill="#ffffff" stroke="{c}" stroke-width="2"/><line x1="200" y1="44" x2="200" y2="108" stroke="#e5e7eb" stroke-width="1"/>"##,
        c = metric.color,
    );
    text(&mut out, 24, 30, 14, 600, "#374151", &title);
    for (x, column) in [(24, left), (216, right)] {
        text(
            &mut out,
            x,
            56,
            11,
            500,
            "#6b7280",
            &prepare(&column.location.label, COLUMN_LABEL_CHARS),
        );
        text(
            &mut out,
            x,
            96,
            32,
            700,
            &metric.color,
            &prepare(&column.statistic.value, BADGE_VALUE_CHARS),
        );
    }
    out.push_str("</svg>");
    out
}

/// Large card for social link previews.
pub fn share_card_svg(metric: &MetricInfo, location: &LocationInfo, stat: &Statistic) -> String {
    let title = prepare(&metric.title, CARD_TITLE_CHARS);
    let value = prepare(&stat.value, BADGE_VALUE_CHARS);
    let place = prepare(&location.label, CARD_TITLE_CHARS);
    let detail = prepare(&stat.detail, CARD_DETAIL_CHARS);
    let source = match (&stat.source, &stat.year) {
        (Some(source), Some(year)) => format!("Source: {} ({})", source, year),
        (Some(source), None) => format!("Source: {}", source),
        (None, Some(year)) => format!("Data year: {}", year),
        (None, None) => String::new(),
    };
    let source = prepare(&source, CARD_SOURCE_CHARS);
    let label = prepare(
        &format!("{} in {}: {}", metric.title, location.label, stat.value),
        160,
    );

    let mut out = String::with_capacity(2048);
    open_svg(&mut out, CARD_WIDTH, CARD_HEIGHT, &label);
    let _ = write!(
        out,
        r##"<rect width="1200" height="630" fill="{c}"/><rect x="40" y="40" width="1120" height="550" rx="24" fill="#ffffff" fill-opacity="0.94"/><rect x="40" y="40" width="16" height="550" rx="8" fill="{c}"/>"##,
        c = metric.color,
    );
    text(&mut out, 96, 140, 48, 700, "#111827", &title);
    text(&mut out, 96, 200, 32, 500, "#4b5563", &place);
    text(&mut out, 96, 360, 144, 800, &metric.color, &value);
    text(&mut out, 96, 440, 28, 400, "#374151", &detail);
    text(&mut out, 96, 550, 22, 400, "#6b7280", &source);
    out.push_str("</svg>");
    out
}
