//! HTTP request handlers.
//!
//! This module is organized into submodules:
//! - `stats`: snapshot and trend JSON
//! - `export`: downloadable CSV/JSON snapshots
//! - `badge`: SVG/PNG badges, comparison badges and share cards
//! - `cache`: cache statistics and clearing
//! - `health`: health check and Prometheus metrics
//! - `common`: response builders and path validation

pub mod badge;
pub mod cache;
pub mod common;
pub mod export;
pub mod health;
pub mod stats;

pub use badge::{badge_handler, compare_handler, share_handler};
pub use cache::{cache_clear_handler, cache_stats_handler};
pub use export::export_handler;
pub use health::{health_handler, metrics_handler};
pub use stats::{stats_handler, trend_handler};
