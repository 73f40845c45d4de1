//! Shared test utilities for the statistics workspace.
//!
//! This crate provides common testing infrastructure including:
//! - A scripted, call-counting [`IndicatorSource`](indicator_client::IndicatorSource)
//! - A manually advanced [`Clock`](equity_common::Clock)
//! - Snapshot and statistic fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```

pub mod clock;
pub mod fixtures;
pub mod source;

pub use clock::ManualClock;
pub use fixtures::*;
pub use source::StubSource;
