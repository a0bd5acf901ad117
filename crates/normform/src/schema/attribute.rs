//! Attribute (column) definition.

use serde::{Deserialize, Serialize};

use super::types::DataType;

/// A named, typed column of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column name, unique within its relation.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// False when some observed value is itself a delimited list.
    pub is_atomic: bool,
}

impl Attribute {
    /// Create an atomic attribute.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_atomic: true,
        }
    }

    /// Set the atomicity flag.
    pub fn with_atomic(mut self, is_atomic: bool) -> Self {
        self.is_atomic = is_atomic;
        self
    }

    /// Column definition as it appears in DDL (`name type`).
    pub fn column_definition(&self) -> String {
        format!("{} {}", self.name, self.data_type)
    }
}
