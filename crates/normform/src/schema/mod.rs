//! Schema model: attributes, functional dependencies and relations.

mod attribute;
mod dependency;
mod relation;
mod types;

pub use attribute::Attribute;
pub use dependency::Dependency;
pub use relation::Relation;
pub use types::{DataType, VARCHAR_STEP};
