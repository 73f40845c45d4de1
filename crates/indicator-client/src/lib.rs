//! Upstream indicator access.
//!
//! [`IndicatorSource`] is the seam between the statistics pipeline and the
//! upstream provider. Its contract is fail-soft: a lookup either returns data
//! or reports absence, it never returns an error. [`WorldBankClient`] is the
//! HTTP implementation.

pub mod client;
pub mod response;
pub mod source;

pub use client::{ClientConfig, FetchError, WorldBankClient};
pub use source::{DateWindow, IndicatorQuery, IndicatorSource, Observation, RawPoint};
