//! Input parsing: sample data files and dependency declarations.

mod dependencies;
mod parser;
mod source;

pub use dependencies::{parse_dependencies, parse_dependency, parse_list_text};
pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
