//! Response builders shared by the handlers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use equity_common::{EquityError, EquityResult, Location, Metric};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Cache lifetime for successful responses.
pub const CACHE_CONTROL_OK: &str = "public, max-age=86400";
/// Cache lifetime for error responses.
pub const CACHE_CONTROL_ERROR: &str = "public, max-age=3600";

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const PNG_CONTENT_TYPE: &str = "image/png";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// JSON error response with the error's status and a short cache lifetime.
pub fn error_response(err: &EquityError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Rejected request");
    }

    let body = serde_json::to_string(&ErrorBody {
        error: err.error_code(),
        message: err.to_string(),
    })
    .unwrap_or_else(|_| r#"{"error":"InternalError"}"#.to_string());

    (
        status,
        [
            (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, CACHE_CONTROL_ERROR),
        ],
        body,
    )
        .into_response()
}

/// Successful response with the long cache lifetime.
pub fn ok_response(content_type: &'static str, body: impl Into<axum::body::Body>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL_OK),
        ],
        body.into(),
    )
        .into_response()
}

/// Serialize `value` as a successful JSON response.
pub fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => ok_response(JSON_CONTENT_TYPE, body),
        Err(e) => error_response(&EquityError::from(e)),
    }
}

/// Collapse a handler result into a response.
pub fn respond(result: EquityResult<Response>) -> Response {
    result.unwrap_or_else(|e| error_response(&e))
}

/// Add `Content-Disposition: attachment` with the given filename.
pub fn with_attachment(mut response: Response, filename: &str) -> Response {
    let value = format!("attachment; filename=\"{}\"", filename);
    if let Ok(value) = HeaderValue::from_str(&value) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

pub fn parse_metric(raw: &str) -> EquityResult<Metric> {
    raw.parse()
}

pub fn parse_location(raw: &str) -> EquityResult<Location> {
    raw.parse()
}

/// Image encoding requested through `?format=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

/// Query parameters accepted by image endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ImageParams {
    pub format: Option<String>,
}

impl ImageParams {
    pub fn image_format(&self) -> EquityResult<ImageFormat> {
        match self.format.as_deref() {
            None | Some("svg") => Ok(ImageFormat::Svg),
            Some("png") => Ok(ImageFormat::Png),
            Some(other) => Err(EquityError::UnsupportedFormat(other.to_string())),
        }
    }
}
