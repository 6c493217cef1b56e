// ABOUTME: Record types produced by the scrape pipeline.
// ABOUTME: RawRow is the extractor output; Record is the normalized, persisted shape.

use serde::{Deserialize, Serialize};

/// One table row as found in the document: trimmed cell texts plus the first link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<String>,
    pub link: Option<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>, link: Option<String>) -> Self {
        Self { cells, link }
    }

    /// Cell text at `index`, or `""` when the row is shorter.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A normalized seismic event report.
///
/// `timestamp_text` and `magnitude_text` are stored exactly as the page shows
/// them. `id` stays `None` until a keyed store assigns one at write time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub reference: String,
    pub report_url: Option<String>,
    pub timestamp_text: String,
    pub magnitude_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Record {
    /// Field names in insertion order. `id` is only listed once assigned.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().into_iter().map(|(name, _)| name).collect()
    }

    /// Field name/value pairs in insertion order; absent optionals are `None`.
    pub fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        let mut fields = vec![
            ("reference", Some(self.reference.as_str())),
            ("report_url", self.report_url.as_deref()),
            ("timestamp_text", Some(self.timestamp_text.as_str())),
            ("magnitude_text", Some(self.magnitude_text.as_str())),
        ];
        if let Some(id) = self.id.as_deref() {
            fields.push(("id", Some(id)));
        }
        fields
    }
}
