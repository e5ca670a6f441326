//! Tabular output
//!
//! Files are header-less CSV. Every collection run truncates its file,
//! appends rows in production order, flushes at each page boundary, and
//! closes once at the end.

use crate::error::Result;
use crate::flatten::FlatRow;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

/// Destination for flattened rows
pub trait RowSink {
    /// Append one row
    fn write_row(&mut self, row: &FlatRow) -> Result<()>;

    /// Push buffered rows to durable storage
    fn flush(&mut self) -> Result<()>;

    /// Flush and release the destination
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// [`RowSink`] writing a CSV file
pub struct CsvSink {
    writer: csv::Writer<File>,
    rows: u64,
}

impl CsvSink {
    /// Create (or truncate) `path`, creating parent directories as needed
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        Ok(Self {
            writer,
            rows: 0,
        })
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl RowSink for CsvSink {
    fn write_row(&mut self, row: &FlatRow) -> Result<()> {
        self.writer.write_record(row.to_record())?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write a lookup list (e.g. `content.sportLookup`) as a CSV file
///
/// Array entries become one row of their elements, object entries one row
/// of their values, and scalars a single-cell row. Rows may differ in width.
pub fn write_lookup(path: &Path, entries: &[Value]) -> Result<u64> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    for entry in entries {
        let cells: Vec<String> = match entry {
            Value::Array(items) => items.iter().map(lookup_cell).collect(),
            Value::Object(map) => map.values().map(lookup_cell).collect(),
            scalar => vec![lookup_cell(scalar)],
        };
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(entries.len() as u64)
}

fn lookup_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{ColumnKind, Schema};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(&[
            ("id", "id", ColumnKind::Int),
            ("name", "name", ColumnKind::Text),
        ])
        .unwrap()
    }

    #[test]
    fn writes_headerless_rows_with_raw_json_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csv").join("countries.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_row(&schema().flatten(&json!({"id": 1, "name": "Ireland"})))
            .unwrap();
        sink.write_row(&schema().flatten(&json!({"name": "Côte d'Ivoire, \"CIV\""})))
            .unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.rows(), 2);
        sink.close().unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "Ireland");
        assert_eq!(&rows[0][2], r#"{"id":1,"name":"Ireland"}"#);
        assert_eq!(&rows[1][0], "", "missing id is a placeholder");
        assert_eq!(&rows[1][1], "Côte d'Ivoire, \"CIV\"");
    }

    #[test]
    fn flushed_rows_are_on_disk_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches_2015.csv");

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_row(&schema().flatten(&json!({"id": 7}))).unwrap();
        sink.flush().unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("7,,"), "got: {on_disk}");
        drop(sink);
    }

    #[test]
    fn create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.csv");
        std::fs::write(&path, "stale,row\n").unwrap();

        let sink = CsvSink::create(&path).unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn lookup_rows_follow_entry_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sports.csv");
        let entries = vec![
            json!(["mru", "Men's Rugby Union"]),
            json!({"code": "wru", "label": "Women's Rugby Union", "order": 2}),
            json!("jm"),
        ];

        let written = write_lookup(&path, &entries).unwrap();
        assert_eq!(written, 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "mru,Men's Rugby Union");
        assert_eq!(lines[1], "wru,Women's Rugby Union,2");
        assert_eq!(lines[2], "jm");
    }
}
