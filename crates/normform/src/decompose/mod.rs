//! Decomposition: splitting relations and walking them up the ladder.

mod diagnostic;
mod engine;
mod equivalence;
mod splitter;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use engine::{DUPLICATE_PREFIX, Decomposition, normalize, normalize_request};
pub use equivalence::equivalent;
pub use splitter::{MIN_SPLIT_WIDTH, Split, split_on, split_on_pair};
