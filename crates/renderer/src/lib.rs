//! Representations of cached statistics.
//!
//! Implements the output formats served by the API:
//! - JSON and CSV exports of a snapshot
//! - SVG badges (single location and two-location comparison)
//! - SVG share cards
//! - PNG rasterization of any of the SVGs

pub mod escape;
pub mod export;
pub mod png;
pub mod svg;

pub use escape::{escape_markup, truncate};
pub use export::{snapshot_csv, snapshot_json, ExportFormat};
pub use png::svg_to_png;
pub use svg::{badge_svg, comparison_svg, share_card_svg, Column};
