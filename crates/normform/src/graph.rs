//! Traversal helpers over a relation's functional-dependency graph.
//!
//! Edges run from a determinant to each of its dependents. All results are
//! [`IndexSet`]s so that iteration follows declaration order, which keeps the
//! classifier's tie-breaks deterministic.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::schema::Dependency;

/// Direct parents of `attribute`: every determinant that lists it as a dependent.
/// Trivial self-edges (`X -> X`) are ignored here and in [`dependents_of`].
pub fn determinants_of<'a>(attribute: &str, dependencies: &'a [Dependency]) -> IndexSet<&'a str> {
    dependencies
        .iter()
        .filter(|d| d.determinant != attribute && d.determines(attribute))
        .map(|d| d.determinant.as_str())
        .collect()
}

/// Direct children of `attribute`: the union of dependents of every
/// dependency it determines.
pub fn dependents_of<'a>(attribute: &str, dependencies: &'a [Dependency]) -> IndexSet<&'a str> {
    dependencies
        .iter()
        .filter(|d| d.determinant == attribute)
        .flat_map(|d| d.dependents.iter().map(String::as_str))
        .filter(|name| *name != attribute)
        .collect()
}

/// Transitive closure of [`dependents_of`].
///
/// The start attribute is only included when a cycle leads back to it.
pub fn descendants_of<'a>(attribute: &str, dependencies: &'a [Dependency]) -> IndexSet<&'a str> {
    descendants_where(attribute, dependencies, |_| true)
}

/// Like [`descendants_of`], but only expands through attributes accepted by
/// `follow`. Rejected attributes are neither collected nor expanded.
pub fn descendants_where<'a, F>(
    attribute: &str,
    dependencies: &'a [Dependency],
    follow: F,
) -> IndexSet<&'a str>
where
    F: Fn(&str) -> bool,
{
    let mut visited: IndexSet<&'a str> = IndexSet::new();
    let mut stack: Vec<&'a str> = dependents_of(attribute, dependencies)
        .into_iter()
        .rev()
        .collect();

    while let Some(current) = stack.pop() {
        if !follow(current) || !visited.insert(current) {
            continue;
        }
        for child in dependents_of(current, dependencies).into_iter().rev() {
            if !visited.contains(child) {
                stack.push(child);
            }
        }
    }

    visited
}

/// Whether walking up the determinant chain from `attribute` reaches a
/// parent set that contains every key attribute.
pub fn is_transitively_key_determined(
    attribute: &str,
    dependencies: &[Dependency],
    key: &[String],
) -> bool {
    let mut visited = HashSet::new();
    walk_up(attribute, dependencies, key, &mut visited)
}

fn walk_up<'a>(
    attribute: &'a str,
    dependencies: &'a [Dependency],
    key: &[String],
    visited: &mut HashSet<&'a str>,
) -> bool {
    if !visited.insert(attribute) {
        return false;
    }

    let parents = determinants_of(attribute, dependencies);
    if parents.is_empty() {
        return false;
    }
    if key.iter().all(|k| parents.contains(k.as_str())) {
        return true;
    }

    parents
        .into_iter()
        .filter(|p| !key.iter().any(|k| k == p))
        .any(|p| walk_up(p, dependencies, key, visited))
}
