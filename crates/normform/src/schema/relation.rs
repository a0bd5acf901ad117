//! Relation: attributes, sample tuples, primary key and dependencies.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::attribute::Attribute;
use super::dependency::Dependency;
use crate::error::{NormalizeError, Result};

/// A single table snapshot plus its declared functional dependencies.
///
/// Column order defines tuple alignment: cell `i` of every tuple belongs to
/// `attributes[i]`. Keys and dependencies refer to attributes by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Table name.
    pub name: String,
    /// Ordered columns.
    pub attributes: Vec<Attribute>,
    /// Raw cell values, one vector per row.
    pub tuples: Vec<Vec<String>>,
    /// Names of the primary-key attributes.
    pub primary_key: Vec<String>,
    /// Declared functional dependencies.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Relation {
    /// Create a relation and check every structural invariant.
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        tuples: Vec<Vec<String>>,
        primary_key: Vec<String>,
        dependencies: Vec<Dependency>,
    ) -> Result<Self> {
        let relation = Self::new_unchecked(name, attributes, tuples, primary_key, dependencies);
        relation.validate()?;
        Ok(relation)
    }

    /// Create a relation without checking invariants.
    ///
    /// Used for raw input that may repeat a column name; such a relation
    /// classifies as UNF until the 1NF repair renames the duplicate.
    pub fn new_unchecked(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        tuples: Vec<Vec<String>>,
        primary_key: Vec<String>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            tuples,
            primary_key,
            dependencies,
        }
    }

    /// Replace the dependency list, checking that every name is an attribute.
    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Result<Self> {
        self.dependencies = dependencies;
        self.check_dependencies()?;
        Ok(self)
    }

    /// Check all four invariants.
    pub fn validate(&self) -> Result<()> {
        self.check_unique_names()?;
        self.validate_structure()
    }

    /// Check every invariant except attribute-name uniqueness.
    pub fn validate_structure(&self) -> Result<()> {
        self.check_tuple_widths()?;
        self.check_primary_key()?;
        self.check_dependencies()
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(attribute.name.as_str()) {
                return Err(NormalizeError::InvalidRelation(format!(
                    "attribute '{}' appears more than once in '{}'",
                    attribute.name, self.name
                )));
            }
        }
        Ok(())
    }

    fn check_tuple_widths(&self) -> Result<()> {
        let width = self.attributes.len();
        if let Some((row, tuple)) = self
            .tuples
            .iter()
            .enumerate()
            .find(|(_, tuple)| tuple.len() != width)
        {
            return Err(NormalizeError::InvalidRelation(format!(
                "row {} of '{}' has {} cells, expected {}",
                row,
                self.name,
                tuple.len(),
                width
            )));
        }
        Ok(())
    }

    fn check_primary_key(&self) -> Result<()> {
        match self.primary_key.iter().find(|k| !self.has_attribute(k)) {
            Some(key) => Err(NormalizeError::UnknownKeyAttribute(key.clone())),
            None => Ok(()),
        }
    }

    fn check_dependencies(&self) -> Result<()> {
        for dependency in &self.dependencies {
            if let Some(missing) = dependency.names().find(|n| !self.has_attribute(n)) {
                return Err(NormalizeError::InvalidRelation(format!(
                    "dependency '{}' references '{}', which is not an attribute of '{}'",
                    dependency, missing, self.name
                )));
            }
        }
        Ok(())
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Number of tuples.
    pub fn row_count(&self) -> usize {
        self.tuples.len()
    }

    /// Attribute names in column order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Column index of an attribute.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Whether the relation has an attribute with this name.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Whether `name` is part of the primary key.
    pub fn is_key(&self, name: &str) -> bool {
        self.primary_key.iter().any(|k| k == name)
    }

    /// Primary-key names as a set.
    pub fn key_set(&self) -> IndexSet<&str> {
        self.primary_key.iter().map(String::as_str).collect()
    }

    /// Attributes outside the primary key, in column order.
    pub fn non_key_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| !self.is_key(&a.name))
    }
}
