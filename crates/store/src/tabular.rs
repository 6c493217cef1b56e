// ABOUTME: CSV file sink. Overwrites the destination with a header plus one row per record.
// ABOUTME: The header comes from the first record; every other record must match it.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use sismos_scrape::Record;
use tracing::info;

use crate::error::SinkError;
use crate::sink::{Sink, SinkKind};

/// Destination used when the caller does not configure one.
pub const DEFAULT_TABULAR_PATH: &str = "sismos.csv";

/// Writes record batches to a local CSV file.
///
/// Not safe to run concurrently against the same path; callers serialize.
#[derive(Debug, Clone)]
pub struct TabularSink {
    path: PathBuf,
}

impl TabularSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for TabularSink {
    fn default() -> Self {
        Self::new(DEFAULT_TABULAR_PATH)
    }
}

impl Sink for TabularSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Tabular
    }

    fn persist(&self, records: &mut [Record]) -> Result<(), SinkError> {
        if records.is_empty() {
            info!(path = %self.path.display(), "no records to write to csv");
            return Ok(());
        }
        // Validate before touching the file so a rejected batch keeps the old contents.
        check_homogeneous(records)?;

        let file = File::create(&self.path).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;
        write_csv(records, file).map_err(|source| SinkError::Csv {
            path: self.path.clone(),
            source,
        })?;

        info!(count = records.len(), path = %self.path.display(), "records saved to csv");
        Ok(())
    }
}

/// Every record must expose the same field set as the first one.
pub fn check_homogeneous(records: &[Record]) -> Result<(), SinkError> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let header = first.field_names();
    match records
        .iter()
        .position(|record| record.field_names() != header)
    {
        Some(index) => Err(SinkError::Heterogeneous { index }),
        None => Ok(()),
    }
}

/// Writes the header and rows as UTF-8 CSV. Absent optionals become empty cells.
pub fn write_csv<W: io::Write>(records: &[Record], out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if let Some(first) = records.first() {
        writer.write_record(first.field_names())?;
    }
    for record in records {
        writer.write_record(record.fields().into_iter().map(|(_, value)| value.unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn record(reference: &str, url: Option<&str>) -> Record {
        Record {
            reference: reference.into(),
            report_url: url.map(str::to_string),
            timestamp_text: "16/10/2026 08:00".into(),
            magnitude_text: "4.0".into(),
            id: None,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(
            &[
                record("Lima, 10 km", Some("https://ultimosismo.igp.gob.pe/reporte/1")),
                record("Ica", None),
            ],
            &mut buf,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "reference,report_url,timestamp_text,magnitude_text\n\
             \"Lima, 10 km\",https://ultimosismo.igp.gob.pe/reporte/1,16/10/2026 08:00,4.0\n\
             Ica,,16/10/2026 08:00,4.0\n"
        );
    }

    #[test]
    fn id_column_appears_when_first_record_has_one() {
        let mut with_id = record("Ica", None);
        with_id.id = Some("0b7c".into());
        let mut buf = Vec::new();
        write_csv(&[with_id], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("reference,report_url,timestamp_text,magnitude_text,id\n"));
        assert!(text.ends_with(",0b7c\n"));
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sismos.csv");
        fs::write(&path, "stale\nstale\nstale\n").unwrap();

        let sink = TabularSink::new(&path);
        sink.persist(&mut [record("Puno", None)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn empty_batch_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sismos.csv");
        TabularSink::new(&path).persist(&mut []).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn mixed_field_sets_are_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sismos.csv");
        fs::write(&path, "previous").unwrap();

        let mut second = record("Tumbes", None);
        second.id = Some("x".into());
        let err = TabularSink::new(&path)
            .persist(&mut [record("Piura", None), second])
            .unwrap_err();

        assert!(matches!(err, SinkError::Heterogeneous { index: 1 }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("sismos.csv");
        let err = TabularSink::new(&path)
            .persist(&mut [record("Lima", None)])
            .unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
