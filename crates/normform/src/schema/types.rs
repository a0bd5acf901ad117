//! Column data types for relation attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Granularity used when sizing `varchar` columns.
pub const VARCHAR_STEP: usize = 50;

/// Data type of an attribute, as inferred from sample cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "length", rename_all = "snake_case")]
pub enum DataType {
    /// A single `0`/`1` bit.
    Bit,
    /// Boolean literals (true/false, yes/no, on/off, t/f).
    Boolean,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Date and/or time values.
    DateTime,
    /// RFC 4122 identifiers.
    Uuid,
    /// Variable-length text with a maximum length.
    VarChar(usize),
}

impl DataType {
    /// The `varchar` type wide enough to hold a value of `char_len` characters.
    ///
    /// Lengths are rounded up to the next multiple of [`VARCHAR_STEP`], so a
    /// 49-character value fits `varchar(50)` and a 50-character one needs
    /// `varchar(100)`.
    pub fn varchar_for(char_len: usize) -> Self {
        DataType::VarChar((char_len / VARCHAR_STEP + 1) * VARCHAR_STEP)
    }

    /// Returns true if this is a text type.
    pub fn is_text(&self) -> bool {
        matches!(self, DataType::VarChar(_))
    }

    /// Whether a column declared with this type can hold a cell of type `other`.
    ///
    /// Text columns accept any narrower text, numeric columns accept narrower
    /// numbers and a boolean column accepts bits. Every other pairing must
    /// match exactly.
    pub fn accepts(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::VarChar(declared), DataType::VarChar(actual)) => actual <= declared,
            (DataType::Integer, DataType::Bit) => true,
            (DataType::Float, DataType::Bit | DataType::Integer) => true,
            (DataType::Boolean, DataType::Bit) => true,
            _ => self == other,
        }
    }

    /// The narrowest type accepting both `self` and `other`, if there is one.
    pub fn widen(self, other: DataType) -> Option<DataType> {
        if self.accepts(&other) {
            Some(self)
        } else if other.accepts(&self) {
            Some(other)
        } else {
            None
        }
    }

    /// SQL rendering used in `CREATE TABLE` statements.
    pub fn sql(&self) -> String {
        match self {
            DataType::Bit => "bit(1)".to_string(),
            DataType::Boolean => "boolean".to_string(),
            DataType::Integer => "int".to_string(),
            DataType::Float => "float".to_string(),
            DataType::DateTime => "datetime".to_string(),
            DataType::Uuid => "UUID".to_string(),
            DataType::VarChar(len) => format!("varchar({})", len),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varchar_rounding() {
        assert_eq!(DataType::varchar_for(0), DataType::VarChar(50));
        assert_eq!(DataType::varchar_for(49), DataType::VarChar(50));
        assert_eq!(DataType::varchar_for(50), DataType::VarChar(100));
        assert_eq!(DataType::varchar_for(120), DataType::VarChar(150));
    }

    #[test]
    fn test_accepts() {
        assert!(DataType::VarChar(100).accepts(&DataType::VarChar(50)));
        assert!(!DataType::VarChar(50).accepts(&DataType::VarChar(100)));
        assert!(DataType::Integer.accepts(&DataType::Integer));
        assert!(!DataType::Integer.accepts(&DataType::Float));
        assert!(!DataType::DateTime.accepts(&DataType::VarChar(50)));
        assert!(DataType::Float.accepts(&DataType::Bit));
        assert!(!DataType::Bit.accepts(&DataType::Integer));
    }

    #[test]
    fn test_widen() {
        assert_eq!(DataType::Bit.widen(DataType::Integer), Some(DataType::Integer));
        assert_eq!(DataType::Float.widen(DataType::Integer), Some(DataType::Float));
        assert_eq!(DataType::Bit.widen(DataType::Boolean), Some(DataType::Boolean));
        assert_eq!(DataType::Integer.widen(DataType::DateTime), None);
    }

    #[test]
    fn test_sql_rendering() {
        assert_eq!(DataType::Bit.sql(), "bit(1)");
        assert_eq!(DataType::Uuid.to_string(), "UUID");
        assert_eq!(DataType::VarChar(150).to_string(), "varchar(150)");
    }
}
