//! Building a typed relation from parsed tabular data.

use std::collections::HashSet;

use tracing::debug;

use super::types::{infer_cell_type, is_list_value};
use crate::error::{NormalizeError, Result};
use crate::input::DataTable;
use crate::schema::{Attribute, DataType, Relation};

/// Default name for relations built from a single upload.
pub const DEFAULT_RELATION_NAME: &str = "R";

/// Builds [`Relation`]s from a header, sample rows and a declared key.
#[derive(Debug, Clone)]
pub struct RelationBuilder {
    name: String,
}

impl RelationBuilder {
    /// Create a builder producing relations with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build a relation, inferring each attribute's type and atomicity.
    ///
    /// Every sampled row is inspected. Columns whose cells disagree on a type
    /// keep the first row's type so the mismatch surfaces when the relation is
    /// classified, not here.
    pub fn build(&self, table: &DataTable, key: &[String]) -> Result<Relation> {
        if let Some(missing) = key.iter().find(|k| !table.headers.contains(k)) {
            return Err(NormalizeError::UnknownKeyAttribute(missing.clone()));
        }

        let attributes: Vec<Attribute> = table
            .headers
            .iter()
            .enumerate()
            .map(|(index, header)| infer_attribute(header, table.column_values(index)))
            .collect();

        let tuples = table.rows.clone();
        let primary_key = key.to_vec();

        let mut seen = HashSet::new();
        let has_duplicate_header = !table.headers.iter().all(|h| seen.insert(h.as_str()));

        let relation = if has_duplicate_header {
            debug!(relation = %self.name, "header repeats a column name, building unchecked");
            let relation =
                Relation::new_unchecked(self.name.clone(), attributes, tuples, primary_key, Vec::new());
            relation.validate_structure()?;
            relation
        } else {
            Relation::new(self.name.clone(), attributes, tuples, primary_key, Vec::new())?
        };

        debug!(
            relation = %relation.name,
            attributes = relation.attribute_count(),
            rows = relation.row_count(),
            "built relation"
        );

        Ok(relation)
    }
}

impl Default for RelationBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RELATION_NAME)
    }
}

/// Infer one attribute from all of its column values.
///
/// Empty cells carry no type information and are skipped. Compatible types
/// widen (`1` then `42` gives an integer column); incompatible ones keep the
/// type seen first.
pub fn infer_attribute<'a>(name: &str, values: impl Iterator<Item = &'a str>) -> Attribute {
    let mut column_type: Option<DataType> = None;
    let mut consistent = true;
    let mut widest_text = 0usize;
    let mut all_text = true;
    let mut is_atomic = true;

    for value in values.filter(|v| !v.trim().is_empty()) {
        let cell_type = infer_cell_type(value);
        match cell_type {
            DataType::VarChar(len) => widest_text = widest_text.max(len),
            _ => all_text = false,
        }

        column_type = match column_type {
            None => Some(cell_type),
            Some(current) => match current.widen(cell_type) {
                Some(wider) => Some(wider),
                None => {
                    consistent = false;
                    Some(current)
                }
            },
        };

        if is_atomic && is_list_value(value) {
            is_atomic = false;
        }
    }

    let data_type = match column_type {
        None => DataType::varchar_for(0),
        Some(_) if all_text => DataType::VarChar(widest_text),
        Some(current) => {
            if !consistent {
                debug!(attribute = name, declared = %current, "column mixes cell types");
            }
            current
        }
    };

    Attribute::new(name, data_type).with_atomic(is_atomic)
}
