//! CSV/TSV sample-data parser with delimiter detection.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{NormalizeError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled when auto-detecting the delimiter.
const DETECTION_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses a header row plus sample data rows.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table plus a fingerprint of its source.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| NormalizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let delimiter = self.resolve_delimiter(&contents)?;
        let table = self.parse_bytes(&contents, delimiter)?;
        let metadata = SourceMetadata::describe(path, &contents, format_name(delimiter), &table);

        Ok((table, metadata))
    }

    /// Parse an in-memory document.
    pub fn parse_str(&self, text: &str) -> Result<DataTable> {
        let delimiter = self.resolve_delimiter(text.as_bytes())?;
        self.parse_bytes(text.as_bytes(), delimiter)
    }

    fn resolve_delimiter(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) if d.is_ascii() && d != b'\n' && d != b'\r' => Ok(d),
            Some(d) => Err(NormalizeError::InvalidDelimiter(format!("{:?}", d as char))),
            None => detect_delimiter(bytes),
        }
    }

    /// Parse bytes with a known delimiter.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(NormalizeError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            // Ragged rows are padded or truncated to the header width
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(NormalizeError::EmptyData("No data rows found".to_string()));
        }

        debug!(
            columns = expected_cols,
            rows = rows.len(),
            delimiter = %(delimiter as char).escape_default(),
            "parsed sample data"
        );

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
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

/// Detect the delimiter from the first few non-blank lines.
///
/// A delimiter that splits every sampled line into the same number of fields
/// wins over one with uneven counts; ties go to the higher field count, and
/// tab beats the others when counts are equal.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(DETECTION_LINES)
        .collect();

    if lines.is_empty() {
        return Err(NormalizeError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }

        let score = if counts.iter().all(|&c| c == first) {
            first * 1000 + usize::from(delim == b'\t') * 100
        } else {
            first
        };

        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim = delimiter as char;
    let mut in_quotes = false;

    line.chars()
        .filter(|&ch| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == delim && !in_quotes
        })
        .count()
}
