//! Error types for the statistics services.

use thiserror::Error;

/// Result type alias using EquityError.
pub type EquityResult<T> = Result<T, EquityError>;

/// Primary error type shared by the statistics crates.
///
/// Upstream failures never appear here: the indicator client resolves them
/// to "no data" before they can reach a caller.
#[derive(Debug, Error)]
pub enum EquityError {
    // === Request Errors ===
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Catalog Errors ===
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to read catalog: {0}")]
    CatalogRead(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl EquityError {
    /// Short machine-readable code included in JSON error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            EquityError::UnknownMetric(_) => "InvalidMetric",
            EquityError::UnknownLocation(_) => "InvalidLocation",
            EquityError::UnsupportedFormat(_) => "InvalidFormat",
            EquityError::RenderError(_) => "RenderFailed",
            _ => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            EquityError::UnknownMetric(_)
            | EquityError::UnknownLocation(_)
            | EquityError::UnsupportedFormat(_) => 400,

            _ => 500,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}

impl From<serde_json::Error> for EquityError {
    fn from(err: serde_json::Error) -> Self {
        EquityError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(EquityError::UnknownMetric("bogus".into()).http_status_code(), 400);
        assert_eq!(EquityError::UnknownLocation("xx".into()).http_status_code(), 400);
        assert_eq!(EquityError::UnsupportedFormat("xml".into()).http_status_code(), 400);
        assert!(EquityError::UnknownMetric("bogus".into()).is_client_error());
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(EquityError::RenderError("bad svg".into()).http_status_code(), 500);
        assert_eq!(EquityError::InternalError("boom".into()).http_status_code(), 500);
        assert!(!EquityError::RenderError("x".into()).is_client_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(EquityError::UnknownMetric("x".into()).error_code(), "InvalidMetric");
        assert_eq!(EquityError::InvalidCatalog("x".into()).error_code(), "InternalError");
    }
}
