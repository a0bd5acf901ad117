//! Error types for the normform library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for normform operations.
///
/// Only caller-facing failures live here. Decomposition stalls are not
/// errors: they come back as [`crate::Diagnostic`] values next to the
/// fragments.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A dependency string could not be turned into a dependency.
    #[error("Malformed dependency '{input}': {reason}")]
    MalformedDependency { input: String, reason: String },

    /// A normal-form token outside `UNF..5NF` (and `auto` where allowed).
    #[error("Invalid normal form: '{0}'. Valid normal forms are UNF, 1NF, 2NF, 3NF, BCNF, 4NF, 5NF")]
    InvalidNormalFormLabel(String),

    /// A requested primary-key column is not in the header.
    #[error("Key attribute '{0}' is not a column of the relation")]
    UnknownKeyAttribute(String),

    /// An attribute name that the relation does not contain.
    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// A split would leave a side with fewer than two attributes.
    #[error("Relation '{relation}' cannot be split on '{determinant}' without leaving a side with fewer than 2 attributes")]
    UnsplittableRelation {
        relation: String,
        determinant: String,
    },

    /// A relation broke one of its structural invariants.
    #[error("Invalid relation: {0}")]
    InvalidRelation(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NormalizeError {
    /// Whether the error was caused by caller input rather than by I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            NormalizeError::MalformedDependency { .. }
                | NormalizeError::InvalidNormalFormLabel(_)
                | NormalizeError::UnknownKeyAttribute(_)
                | NormalizeError::UnknownAttribute(_)
                | NormalizeError::EmptyData(_)
                | NormalizeError::InvalidDelimiter(_)
                | NormalizeError::Csv(_)
        )
    }
}

/// Result type alias for normform operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
