//! Parsed sample rows, and the fingerprint of the file they were read from.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where a sample came from, so a report can be tied back to its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub file: String,
    pub path: PathBuf,
    /// `sha256:<hex>` of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// `csv`, `tsv`, `psv`, ...
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Fingerprint `contents`, read from `path` and parsed into `table`.
    pub(crate) fn describe(path: &Path, contents: &[u8], format: &str, table: &DataTable) -> Self {
        let digest = Sha256::digest(contents);

        Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", digest),
            size_bytes: contents.len() as u64,
            format: format.to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// A header row plus sample rows, every cell kept as text.
///
/// The parser pads or truncates rows to the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom. A short row reads as empty.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map_or("", String::as_str))
    }
}
