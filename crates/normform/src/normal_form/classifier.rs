//! Normal-form predicates and classification.
//!
//! Each predicate returns the evidence for its first violation rather than a
//! bare boolean, so the decomposition engine can split on exactly what the
//! classifier found without walking the dependency graph again.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::level::NormalForm;
use crate::graph::{dependents_of, determinants_of, is_transitively_key_determined};
use crate::inference::infer_cell_type;
use crate::schema::{Dependency, Relation};

/// Relations narrower than this hold 2NF through 5NF vacuously.
pub const MIN_DECOMPOSABLE_ATTRIBUTES: usize = 3;

/// What kind of rule a relation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    NonAtomicAttribute,
    DuplicateAttributeName,
    DuplicateRow,
    TypeMismatch,
    MissingPrimaryKey,
    PartialDependency,
    TransitiveDependency,
    NonKeyDeterminant,
    MultiValuedDependency,
    PossibleJoinDependency,
}

/// Evidence that a relation fails one level's predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The level whose predicate failed.
    pub level: NormalForm,
    pub kind: ViolationKind,
    /// Attributes involved in the violation.
    pub attributes: Vec<String>,
    /// Determinant to split on, when one could be identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determinant: Option<String>,
    /// The dependent paired with `determinant`, for pair-shaped evidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent: Option<String>,
    /// Offending row index, for row-level 1NF violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(level: NormalForm, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            attributes: Vec::new(),
            determinant: None,
            dependent: None,
            row: None,
            message: message.into(),
        }
    }

    fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    fn with_pair(mut self, determinant: &str, dependent: Option<&str>) -> Self {
        self.determinant = Some(determinant.to_string());
        self.dependent = dependent.map(str::to_string);
        self
    }

    fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Result of classifying a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Highest level whose predicate, and every predicate below it, holds.
    pub normal_form: NormalForm,
    /// Evidence for the first failing level, `None` at 5NF.
    pub violation: Option<Violation>,
}

/// Classify a relation: evaluate predicates in ascending order and stop at
/// the first failure.
pub fn classify(relation: &Relation) -> Classification {
    for level in NormalForm::ALL.into_iter().skip(1) {
        if let Some(violation) = check(level, relation) {
            let normal_form = level.previous().unwrap_or(NormalForm::Unnormalized);
            debug!(
                relation = %relation.name,
                normal_form = %normal_form,
                failed = %level,
                "classified relation"
            );
            return Classification {
                normal_form,
                violation: Some(violation),
            };
        }
    }

    Classification {
        normal_form: NormalForm::Fifth,
        violation: None,
    }
}

/// Highest normal form the relation satisfies.
pub fn determine_normal_form(relation: &Relation) -> NormalForm {
    classify(relation).normal_form
}

/// Whether the relation satisfies `level`'s own predicate.
///
/// Lower levels are not checked; use [`determine_normal_form`] for that.
pub fn satisfies(level: NormalForm, relation: &Relation) -> bool {
    check(level, relation).is_none()
}

/// Evaluate one level's predicate, returning the first violation found.
pub fn check(level: NormalForm, relation: &Relation) -> Option<Violation> {
    if level >= NormalForm::Second && relation.attribute_count() < MIN_DECOMPOSABLE_ATTRIBUTES {
        return None;
    }

    match level {
        NormalForm::Unnormalized => None,
        NormalForm::First => check_first(relation),
        NormalForm::Second => check_second(relation),
        NormalForm::Third => check_third(relation),
        NormalForm::BoyceCodd => check_boyce_codd(relation),
        NormalForm::Fourth => check_fourth(relation),
        NormalForm::Fifth => check_fifth(relation),
    }
}

// =============================================================================
// 1NF
// =============================================================================

fn check_first(relation: &Relation) -> Option<Violation> {
    let level = NormalForm::First;

    if let Some(attribute) = relation.attributes.iter().find(|a| !a.is_atomic) {
        return Some(
            Violation::new(
                level,
                ViolationKind::NonAtomicAttribute,
                format!("attribute '{}' holds list values", attribute.name),
            )
            .with_attributes([attribute.name.as_str()]),
        );
    }

    let mut names = HashSet::new();
    if let Some(attribute) = relation
        .attributes
        .iter()
        .find(|a| !names.insert(a.name.as_str()))
    {
        return Some(
            Violation::new(
                level,
                ViolationKind::DuplicateAttributeName,
                format!("attribute name '{}' is used more than once", attribute.name),
            )
            .with_attributes([attribute.name.as_str()]),
        );
    }

    let mut rows = HashSet::new();
    if let Some((index, tuple)) = relation
        .tuples
        .iter()
        .enumerate()
        .find(|(_, tuple)| !rows.insert(tuple.as_slice()))
    {
        return Some(
            Violation::new(
                level,
                ViolationKind::DuplicateRow,
                format!("row {} repeats ({})", index, tuple.join(", ")),
            )
            .with_row(index),
        );
    }

    if let Some(violation) = find_type_mismatch(relation) {
        return Some(violation);
    }

    if relation.primary_key.is_empty() {
        return Some(Violation::new(
            level,
            ViolationKind::MissingPrimaryKey,
            format!("relation '{}' has no primary key", relation.name),
        ));
    }

    None
}

/// First cell whose own type the column's declared type does not accept.
/// Empty cells are treated as missing values.
pub(crate) fn find_type_mismatch(relation: &Relation) -> Option<Violation> {
    for (row, tuple) in relation.tuples.iter().enumerate() {
        for (attribute, cell) in relation.attributes.iter().zip(tuple) {
            if cell.trim().is_empty() {
                continue;
            }
            let actual = infer_cell_type(cell);
            if !attribute.data_type.accepts(&actual) {
                return Some(
                    Violation::new(
                        NormalForm::First,
                        ViolationKind::TypeMismatch,
                        format!(
                            "value '{}' in row {} is {}, but '{}' is {}",
                            cell, row, actual, attribute.name, attribute.data_type
                        ),
                    )
                    .with_attributes([attribute.name.as_str()])
                    .with_row(row),
                );
            }
        }
    }
    None
}

// =============================================================================
// 2NF / 3NF / BCNF
// =============================================================================

/// A non-key attribute determined by one part of a composite key.
fn check_second(relation: &Relation) -> Option<Violation> {
    if relation.primary_key.len() < 2 {
        return None;
    }

    // Key attributes are visited in column order so the evidence is stable.
    relation
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .filter(|name| relation.is_key(name))
        .find_map(|key_part| {
            let dependent = dependents_of(key_part, &relation.dependencies)
                .into_iter()
                .find(|d| !relation.is_key(d))?;
            Some(
                Violation::new(
                    NormalForm::Second,
                    ViolationKind::PartialDependency,
                    format!(
                        "'{}' depends on '{}', only part of the key ({})",
                        dependent,
                        key_part,
                        relation.primary_key.join(", ")
                    ),
                )
                .with_attributes([key_part, dependent])
                .with_pair(key_part, Some(dependent)),
            )
        })
}

/// An attribute determined by a non-key attribute that the key itself reaches.
fn check_third(relation: &Relation) -> Option<Violation> {
    let deps = &relation.dependencies;

    relation.attributes.iter().find_map(|attribute| {
        let parent = determinants_of(&attribute.name, deps).into_iter().find(|p| {
            !relation.is_key(p) && is_transitively_key_determined(p, deps, &relation.primary_key)
        })?;
        Some(
            Violation::new(
                NormalForm::Third,
                ViolationKind::TransitiveDependency,
                format!(
                    "'{}' depends on the key only through '{}'",
                    attribute.name, parent
                ),
            )
            .with_attributes([parent, attribute.name.as_str()])
            .with_pair(parent, Some(attribute.name.as_str())),
        )
    })
}

/// An attribute whose determinants are not exactly the key.
fn check_boyce_codd(relation: &Relation) -> Option<Violation> {
    let deps = &relation.dependencies;
    let key = relation.key_set();

    let (attribute, parents) = relation.attributes.iter().find_map(|attribute| {
        let parents = determinants_of(&attribute.name, deps);
        let matches_key = parents.len() == key.len() && parents.iter().all(|p| key.contains(p));
        (!parents.is_empty() && !matches_key).then_some((attribute, parents))
    })?;

    let determinant = deps
        .iter()
        .filter(|d| !d.is_trivial())
        .map(|d| d.determinant.as_str())
        .find(|d| !relation.is_key(d));

    let parents: Vec<&str> = parents.into_iter().collect();
    let violation = Violation::new(
        NormalForm::BoyceCodd,
        ViolationKind::NonKeyDeterminant,
        format!(
            "'{}' is determined by ({}), not by the key ({})",
            attribute.name,
            parents.join(", "),
            relation.primary_key.join(", ")
        ),
    )
    .with_attributes(std::iter::once(attribute.name.as_str()).chain(parents));

    Some(match determinant {
        Some(determinant) => violation.with_pair(determinant, None),
        None => violation,
    })
}

// =============================================================================
// 4NF / 5NF
// =============================================================================

/// A declared determinant whose value repeats with more than one distinct
/// value of one of its dependents in the sample.
fn check_fourth(relation: &Relation) -> Option<Violation> {
    for dependency in &relation.dependencies {
        let Some(det_idx) = relation.attribute_index(&dependency.determinant) else {
            continue;
        };

        for dependent in &dependency.dependents {
            let Some(dep_idx) = relation.attribute_index(dependent) else {
                continue;
            };
            if dep_idx == det_idx {
                continue;
            }

            let mut groups: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
            for tuple in &relation.tuples {
                groups
                    .entry(tuple[det_idx].as_str())
                    .or_default()
                    .insert(tuple[dep_idx].as_str());
            }

            if let Some((value, seen)) = groups.iter().find(|(_, seen)| seen.len() > 1) {
                return Some(
                    Violation::new(
                        NormalForm::Fourth,
                        ViolationKind::MultiValuedDependency,
                        format!(
                            "'{}' = '{}' appears with {} distinct '{}' values",
                            dependency.determinant,
                            value,
                            seen.len(),
                            dependent
                        ),
                    )
                    .with_attributes([dependency.determinant.as_str(), dependent.as_str()])
                    .with_pair(&dependency.determinant, Some(dependent.as_str())),
                );
            }
        }
    }
    None
}

/// Conservative join-dependency heuristic.
///
/// Holds when every attribute is part of the key, or when a single
/// dependency from the (single-attribute) key covers exactly the non-key
/// attributes.
fn check_fifth(relation: &Relation) -> Option<Violation> {
    let non_key: IndexSet<&str> = relation
        .non_key_attributes()
        .map(|a| a.name.as_str())
        .collect();
    if non_key.is_empty() {
        return None;
    }

    let dependencies: Vec<&Dependency> = relation
        .dependencies
        .iter()
        .filter(|d| !d.is_trivial())
        .collect();
    if let [dependency] = dependencies.as_slice() {
        let keyed = relation.primary_key.len() == 1 && relation.primary_key[0] == dependency.determinant;
        let covers = dependency.dependents.len() == non_key.len()
            && non_key.iter().all(|n| dependency.determines(n));
        if keyed && covers {
            return None;
        }
    }

    let uncovered: Vec<&str> = non_key
        .iter()
        .copied()
        .filter(|n| {
            !relation
                .dependencies
                .iter()
                .any(|d| relation.is_key(&d.determinant) && d.determines(n))
        })
        .collect();

    Some(
        Violation::new(
            NormalForm::Fifth,
            ViolationKind::PossibleJoinDependency,
            if uncovered.is_empty() {
                "non-key attributes are not covered by a single dependency on the key".to_string()
            } else {
                format!(
                    "({}) may be joined in rather than determined by the key",
                    uncovered.join(", ")
                )
            },
        )
        .with_attributes(if uncovered.is_empty() {
            non_key.iter().copied().collect::<Vec<_>>()
        } else {
            uncovered
        }),
    )
}
