//! normform: normal-form classification and lossless decomposition of
//! relational tables.
//!
//! A relation is one table snapshot (columns, sample rows, a primary key)
//! plus declared functional dependencies. normform places it on the
//! `UNF < 1NF < 2NF < 3NF < BCNF < 4NF < 5NF` ladder and, on request,
//! splits it into fragments that reach a target level without dropping a
//! column or a row.
//!
//! # Core Principles
//!
//! - **Evidence-driven**: every classification carries the violation that
//!   stopped it, and decomposition splits on exactly that evidence
//! - **Lossless**: splits copy the determinant into both sides and move every
//!   other column to exactly one
//! - **Best effort above BCNF**: 4NF and 5NF are checked against the sample,
//!   and stalls are reported as diagnostics, never as errors
//!
//! # Example
//!
//! ```no_run
//! use normform::{NormalForm, Normalizer, NormalizerConfig};
//!
//! let normalizer = Normalizer::with_config(NormalizerConfig {
//!     target: NormalForm::BoyceCodd,
//!     ..NormalizerConfig::default()
//! });
//! let keys = vec!["Course".to_string()];
//! let deps = vec!["Course -> Professor".to_string()];
//! let report = normalizer.run_file("courses.csv", &keys, &deps).unwrap();
//!
//! println!("Detected: {}", report.detected_normal_form);
//! println!("{}", report.ddl_script());
//! ```

pub mod ddl;
pub mod decompose;
pub mod error;
pub mod graph;
pub mod inference;
pub mod input;
pub mod normal_form;
pub mod schema;

mod normalizer;

pub use crate::normalizer::{
    Fragment, InputSummary, NormalizationReport, Normalizer, NormalizerConfig,
};
pub use decompose::{
    Decomposition, Diagnostic, DiagnosticKind, Severity, Split, equivalent, normalize,
    normalize_request, split_on, split_on_pair,
};
pub use error::{NormalizeError, Result};
pub use inference::RelationBuilder;
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata, parse_dependencies, parse_dependency};
pub use normal_form::{
    Classification, NormalForm, NormalFormRequest, Violation, ViolationKind, classify,
    determine_normal_form, satisfies,
};
pub use schema::{Attribute, DataType, Dependency, Relation};
