//! In-memory table backing one locator.
//!
//! Every column is read as text, so a cell shows exactly what the CSV file
//! holds and identifier matching is plain string equality.

use crate::error::{Result, ViewerError};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_CHAR: char = '\u{feff}';

/// One row, as (column name, cell text) pairs in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub row_index: usize,
    pub fields: Vec<(String, String)>,
}

impl Record {
    /// Cell text for a column; empty when the column is unknown.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        // A BOM that survived decoding sticks to the first header name
        let first = frame.get_column_names().first().map(|s| s.to_string());
        if let Some(first) = first {
            if first.starts_with(BOM_CHAR) {
                let cleaned = first.trim_start_matches(BOM_CHAR).to_string();
                frame.rename(&first, &cleaned)?;
            }
        }
        Ok(Self { frame })
    }

    /// Parse CSV text that has a header row.
    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Self::from_frame(frame)
    }

    /// Parse CSV bytes as UTF-8 with a leading byte-order mark.
    pub fn from_csv_bytes_with_bom(bytes: Vec<u8>) -> Result<Self> {
        let body = match bytes.strip_prefix(UTF8_BOM) {
            Some(rest) => rest.to_vec(),
            None => bytes,
        };
        Self::from_csv_bytes(body)
    }

    /// Scan one CSV file from disk. The path is taken literally, never as a glob.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let frame = LazyCsvReader::new(path)
            .with_glob(false)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Self::from_frame(frame)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.frame.get_column_names().iter().any(|c| *c == column)
    }

    /// Column values as text (null stays `None`).
    fn text_column(&self, column: &str) -> Result<Vec<Option<String>>> {
        let series = self.frame.column(column)?.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        Ok(values)
    }

    /// First row whose `column` text equals `identifier`. Null cells never match.
    pub fn find_row(&self, column: &str, identifier: &str) -> Result<Option<usize>> {
        let values = self.text_column(column)?;
        Ok(values
            .iter()
            .position(|v| v.as_deref() == Some(identifier)))
    }

    /// Materialize one row; null cells become empty strings.
    pub fn record(&self, row_index: usize) -> Result<Record> {
        if row_index >= self.height() {
            return Err(ViewerError::Polars(format!(
                "row {} out of bounds for table of height {}",
                row_index,
                self.height()
            )));
        }

        let mut fields = Vec::new();
        for name in self.column_names() {
            let series = self.frame.column(&name)?.cast(&DataType::String)?;
            let value = series.str()?.get(row_index).unwrap_or("").to_string();
            fields.push((name, value));
        }

        Ok(Record { row_index, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_csv_bytes(b"id,name,note\nA1,Widget,\nA2,Gadget,spare\n007,Bond,agent\n".to_vec())
            .unwrap()
    }

    #[test]
    fn test_columns_and_height() {
        let ds = sample();
        assert_eq!(ds.height(), 3);
        assert_eq!(ds.column_names(), vec!["id", "name", "note"]);
        assert!(ds.has_column("note"));
        assert!(!ds.has_column("Name"));
    }

    #[test]
    fn test_values_stay_text() {
        let ds = sample();
        assert_eq!(ds.find_row("id", "007").unwrap(), Some(2));
        assert_eq!(ds.find_row("id", "7").unwrap(), None);
        assert_eq!(ds.find_row("id", "A2").unwrap(), Some(1));
    }

    #[test]
    fn test_record_nulls_are_empty() {
        let record = sample().record(0).unwrap();
        assert_eq!(record.get("id"), "A1");
        assert_eq!(record.get("note"), "");
        assert_eq!(record.get("missing"), "");
        assert!(sample().record(10).is_err());
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"id,name\nA1,Widget\n");
        let ds = Dataset::from_csv_bytes_with_bom(bytes.clone()).unwrap();
        assert_eq!(ds.column_names(), vec!["id", "name"]);

        // Plain parse must not leave the BOM glued to the first header either
        let ds = Dataset::from_csv_bytes(bytes).unwrap();
        assert!(ds.has_column("id"));
    }

    #[test]
    fn test_path_is_not_a_pattern() {
        let dir = std::env::temp_dir().join(format!("record_viewer_dataset_glob_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.csv"), "id\nA1\n").unwrap();
        std::fs::write(dir.join("b.csv"), "id\nB1\n").unwrap();
        std::fs::write(dir.join("d[1].csv"), "id,name\nD1,Drum\n").unwrap();

        assert!(Dataset::from_csv_path(&dir.join("*.csv")).is_err());
        let ds = Dataset::from_csv_path(&dir.join("d[1].csv")).unwrap();
        assert_eq!(ds.height(), 1);
        assert_eq!(ds.record(0).unwrap().get("name"), "Drum");
    }

    #[test]
    fn test_header_only_is_empty() {
        let ds = Dataset::from_csv_bytes(b"id,name\n".to_vec()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names().len(), 2);
    }
}
