//! Inference of attribute types and construction of relations from raw data.

mod relation;
mod types;

pub use relation::{DEFAULT_RELATION_NAME, RelationBuilder, infer_attribute};
pub use types::{infer_cell_type, is_boolean_literal, is_date_time, is_list_value};
