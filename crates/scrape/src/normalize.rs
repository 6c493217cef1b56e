// ABOUTME: Maps raw table rows onto Record values.
// ABOUTME: Fixed positional column contract, reference whitespace cleanup and link resolution.

use url::Url;

use crate::error::RowError;
use crate::models::{RawRow, Record};

// Column positions on the source page. This is a positional contract with the
// page layout: column 1 (depth/epicenter details) and anything past column 3
// are ignored, and a reordered table silently maps the wrong cells. Headers are
// not consulted.
pub const REFERENCE_COLUMN: usize = 0;
pub const TIMESTAMP_COLUMN: usize = 2;
pub const MAGNITUDE_COLUMN: usize = 3;

/// Builds a record from one raw row.
///
/// Short rows produce empty strings for the missing columns. A row with no
/// cells at all, or whose link cannot be resolved, is an error so the caller
/// can skip it.
pub fn normalize(row: &RawRow, base_url: &Url) -> Result<Record, RowError> {
    if row.cells.is_empty() {
        return Err(RowError::NoCells);
    }

    let report_url = row
        .link
        .as_deref()
        .map(|href| resolve_report_url(href, base_url))
        .transpose()?;

    Ok(Record {
        reference: normalize_reference(row.cell(REFERENCE_COLUMN)),
        report_url,
        timestamp_text: row.cell(TIMESTAMP_COLUMN).to_string(),
        magnitude_text: row.cell(MAGNITUDE_COLUMN).to_string(),
        id: None,
    })
}

/// Splits on line breaks, trims every segment, drops empty ones and joins with one space.
pub fn normalize_reference(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a row link against the base URL. Absolute links come back unchanged.
pub fn resolve_report_url(href: &str, base_url: &Url) -> Result<String, RowError> {
    base_url
        .join(href.trim())
        .map(|url| url.to_string())
        .map_err(|e| RowError::InvalidLink {
            href: href.to_string(),
            reason: e.to_string(),
        })
}
