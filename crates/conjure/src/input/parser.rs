//! CSV/TSV reader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{ConjureError, Result};

/// Delimiters tried when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the first row holds the question headers.
    pub has_header: bool,
    /// Maximum respondents to read (None = all).
    pub max_rows: Option<usize>,
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Parses delimited response exports.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file into a table plus metadata about the file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| ConjureError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed response file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format_name(table.delimiter).to_string(),
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse in-memory contents.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();
        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|s| s.trim().to_string()).collect(),
                None => return Err(ConjureError::EmptyData("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for result in records {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        let headers = if self.config.has_header {
            headers
        } else {
            let width = rows.first().map(Vec::len).unwrap_or(0);
            (1..=width).map(|i| format!("column_{}", i)).collect()
        };

        if headers.is_empty() {
            return Err(ConjureError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(ConjureError::EmptyData("No responses found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Pick the delimiter that splits the first lines most consistently.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ConjureError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Tabs rarely appear inside free-text answers.
        let score = if counts.iter().all(|&c| c == first_count) {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences outside quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_ignores_quoted_commas() {
        let data = b"a;b\n\"x, y, z\";2\n\"p, q\";3";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_responses() {
        let data = b"How are you?,Age\nGood,30\n\"Fine, thanks\",25";
        let table = Parser::new().parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["How are you?", "Age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 0), Some("Fine, thanks"));
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_parse_strips_bom_and_pads_rows() {
        let data = b"\xEF\xBB\xBFq1,q2,q3\n1,2\n";
        let table = Parser::new().parse_bytes(data).unwrap();
        assert_eq!(table.headers[0], "q1");
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_parse_without_header() {
        let config = ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        };
        let table = Parser::with_config(config)
            .parse_bytes(b"1,2\n3,4\n")
            .unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig::default().with_max_rows(1));
        let table = parser.parse_bytes(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Parser::new().parse_bytes(b"a,b\n").unwrap_err();
        assert!(matches!(err, ConjureError::EmptyData(_)));
    }

    #[test]
    fn test_parse_file_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a\tb\n1\t2\n").unwrap();
        file.flush().unwrap();

        let (table, meta) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(table.delimiter, b'\t');
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.size_bytes, 8);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.respondent_count, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = Parser::new().parse_file("/nonexistent/file.csv").unwrap_err();
        assert!(matches!(err, ConjureError::Io { .. }));
    }
}
