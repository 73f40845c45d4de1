//! Downloadable snapshot exports (JSON and CSV).

use equity_common::{EquityError, EquityResult, Snapshot};

/// CSV header row.
pub const CSV_HEADER: [&str; 5] = ["Metric", "Value", "Detail", "Year", "Source"];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> EquityResult<Self> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(EquityError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Serialize a snapshot as JSON.
pub fn snapshot_json(snapshot: &Snapshot) -> EquityResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Render a snapshot as CSV: a header plus one row per metric in
/// `Metric::ALL` order. Missing year/source become empty fields.
pub fn snapshot_csv(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    push_row(&mut out, &CSV_HEADER);
    for (metric, stat) in snapshot.iter() {
        push_row(
            &mut out,
            &[
                metric.key(),
                &stat.value,
                &stat.detail,
                stat.year.as_deref().unwrap_or(""),
                stat.source.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote or line break.
pub fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
