//! Structural and content equality between relations.

use std::collections::HashSet;

use crate::schema::{Dependency, Relation};

/// Whether two relations hold the same schema and the same data.
///
/// Attribute and key names are compared as sets, dependencies as sets of
/// `(determinant, {dependents})`, and tuples as a multiset in which each
/// tuple is itself an unordered multiset of cells. Column order and row order
/// are therefore irrelevant.
pub fn equivalent(x: &Relation, y: &Relation) -> bool {
    x.name == y.name
        && name_set(x.attributes.iter().map(|a| a.name.as_str()))
            == name_set(y.attributes.iter().map(|a| a.name.as_str()))
        && x.key_set() == y.key_set()
        && same_dependencies(&x.dependencies, &y.dependencies)
        && tuple_multiset(x) == tuple_multiset(y)
}

fn name_set<'a>(names: impl Iterator<Item = &'a str>) -> HashSet<&'a str> {
    names.collect()
}

fn same_dependencies(a: &[Dependency], b: &[Dependency]) -> bool {
    a.len() == b.len() && a.iter().all(|d| b.contains(d)) && b.iter().all(|d| a.contains(d))
}

fn tuple_multiset(relation: &Relation) -> Vec<Vec<&str>> {
    let mut tuples: Vec<Vec<&str>> = relation
        .tuples
        .iter()
        .map(|tuple| {
            let mut cells: Vec<&str> = tuple.iter().map(String::as_str).collect();
            cells.sort_unstable();
            cells
        })
        .collect();
    tuples.sort_unstable();
    tuples
}
