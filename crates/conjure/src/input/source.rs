//! Response tables and where they came from.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about a loaded response file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    pub path: PathBuf,
    /// SHA-256 of the file contents, as `sha256:<hex>`.
    pub hash: String,
    pub size_bytes: u64,
    /// Detected format (csv, tsv, ...).
    pub format: String,
    /// Number of respondents (rows, excluding the header).
    pub respondent_count: usize,
    /// Number of columns, one per question.
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        respondent_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            respondent_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Raw survey responses: one column per question, one row per respondent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Column headers, usually the question text.
    pub headers: Vec<String>,
    /// Responses in row-major order; every row has one cell per header.
    pub rows: Vec<Vec<String>>,
    pub delimiter: u8,
}

impl DataTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of respondents.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All responses for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Whether a response counts as missing.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("#n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("<na>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_fit_header_width() {
        let table = DataTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into()]],
            b',',
        );
        assert_eq!(table.rows[0], vec!["1", ""]);
        assert_eq!(table.rows[1], vec!["1", "2"]);
        assert_eq!(table.column_values(1).collect::<Vec<_>>(), vec!["", "2"]);
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("  "));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("n/a"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("null"));
        assert!(!DataTable::is_null_value("None of the above"));
        assert!(!DataTable::is_null_value("0"));
        assert!(!DataTable::is_null_value("-"));
    }

    #[test]
    fn test_metadata_file_name() {
        let meta = SourceMetadata::new(
            PathBuf::from("/data/responses.csv"),
            "sha256:00".into(),
            10,
            "csv".into(),
            2,
            3,
        );
        assert_eq!(meta.file, "responses.csv");
        assert_eq!(meta.respondent_count, 2);
    }
}
