//! Level-by-level decomposition driven by classifier evidence.
//!
//! Every level shares one procedure: ask the classifier for the violation,
//! split on its determinant, bring both fragments back up to the level being
//! processed, and splice them into the working set where the original was.
//! 1NF is the exception: it is repaired in place rather than split.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use super::splitter::{Split, split_on, split_on_pair};
use crate::error::Result;
use crate::normal_form::{
    NormalForm, NormalFormRequest, Violation, check, determine_normal_form, find_type_mismatch,
};
use crate::schema::{Dependency, Relation};

/// Prefix given to a column renamed because its name repeats.
pub const DUPLICATE_PREFIX: &str = "Duplicate_";

/// Output of [`normalize`]: the fragments plus everything worth reporting
/// about how they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition {
    pub relations: Vec<Relation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decomposition {
    /// Diagnostics at warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Whether every fragment reached the target without a stall.
    pub fn is_complete(&self) -> bool {
        self.warnings().next().is_none()
    }
}

/// Decompose `relation` until every fragment satisfies `target`.
///
/// `current` is classified when not given. When `target <= current` the
/// relation comes back as the only fragment, untouched.
///
/// Never fails: fragments that cannot be split further are kept as they are
/// and explained by a [`Diagnostic`].
pub fn normalize(
    relation: Relation,
    target: NormalForm,
    current: Option<NormalForm>,
) -> Decomposition {
    let current = current.unwrap_or_else(|| determine_normal_form(&relation));

    if target <= current {
        debug!(
            relation = %relation.name,
            current = %current,
            goal = %target,
            "already at target"
        );
        return Decomposition {
            relations: vec![relation],
            diagnostics: Vec::new(),
        };
    }

    info!(relation = %relation.name, from = %current, to = %target, "normalizing");

    let mut decomposer = Decomposer::new(&relation);
    let relations = decomposer.raise(vec![relation], current, target, 0);

    Decomposition {
        relations,
        diagnostics: decomposer.diagnostics,
    }
}

/// [`normalize`] with the current level given as a boundary request.
pub fn normalize_request(
    relation: Relation,
    target: NormalForm,
    current: NormalFormRequest,
) -> Decomposition {
    normalize(relation, target, current.level())
}

/// Mutable state for one `normalize` call.
struct Decomposer {
    diagnostics: Vec<Diagnostic>,
    /// Relation names handed out so far.
    names: HashSet<String>,
    /// Recursion bound: no chain of splits can be longer than the root is wide.
    max_depth: usize,
}

impl Decomposer {
    fn new(root: &Relation) -> Self {
        Self {
            diagnostics: Vec::new(),
            names: HashSet::from([root.name.clone()]),
            max_depth: root.attribute_count(),
        }
    }

    /// Walk `working` through every level in `(from, to]`.
    fn raise(
        &mut self,
        mut working: Vec<Relation>,
        from: NormalForm,
        to: NormalForm,
        depth: usize,
    ) -> Vec<Relation> {
        for level in from.steps_to(to) {
            let keys: Vec<Vec<String>> = working.iter().map(|r| r.primary_key.clone()).collect();
            let mut next = Vec::with_capacity(working.len());

            for (index, relation) in working.into_iter().enumerate() {
                let sibling_keys: HashSet<&str> = keys
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .flat_map(|(_, key)| key.iter().map(String::as_str))
                    .collect();
                next.extend(self.step(relation, level, &sibling_keys, depth));
            }

            working = next;
            if depth == 0 {
                info!(level = %level, fragments = working.len(), "reached level");
            }
        }
        working
    }

    /// Apply one level to one fragment.
    fn step(
        &mut self,
        relation: Relation,
        level: NormalForm,
        sibling_keys: &HashSet<&str>,
        depth: usize,
    ) -> Vec<Relation> {
        if level == NormalForm::First {
            return vec![self.repair(relation)];
        }

        let Some(violation) = check(level, &relation) else {
            return vec![relation];
        };

        if depth >= self.max_depth {
            self.stall(&relation, level, "split depth limit reached");
            return vec![relation];
        }

        let split = match self.split_for(&relation, level, &violation, sibling_keys) {
            None => {
                self.stall(
                    &relation,
                    level,
                    format!("{}; no determinant to split on", violation.message),
                );
                return vec![relation];
            }
            Some(Err(err)) => {
                self.record(Diagnostic::warning(
                    DiagnosticKind::Unsplittable,
                    &relation.name,
                    level,
                    format!("{}: {}", violation.message, err),
                ));
                return vec![relation];
            }
            Some(Ok(split)) => split,
        };

        debug_assert!(
            split.carried.attribute_count() < relation.attribute_count()
                && split.remaining.attribute_count() < relation.attribute_count()
        );

        debug!(
            relation = %relation.name,
            level = %level,
            carried = %split.carried.name,
            carried_attributes = ?split.carried.attribute_names(),
            remaining_attributes = ?split.remaining.attribute_names(),
            "split relation"
        );

        let Split { carried, remaining } = split;
        let mut fragments = self.descend(remaining, level, depth + 1);
        fragments.extend(self.descend(carried, level, depth + 1));
        fragments
    }

    /// Bring a fresh fragment up to `level`, starting from its own class.
    fn descend(&mut self, fragment: Relation, level: NormalForm, depth: usize) -> Vec<Relation> {
        let current = determine_normal_form(&fragment);
        if current >= level {
            return vec![fragment];
        }
        self.raise(vec![fragment], current, level, depth)
    }

    /// Turn a violation into a split, or `None` when there is nothing to split on.
    fn split_for(
        &mut self,
        relation: &Relation,
        level: NormalForm,
        violation: &Violation,
        sibling_keys: &HashSet<&str>,
    ) -> Option<Result<Split>> {
        match level {
            NormalForm::Second => {
                let determinant = violation.determinant.as_deref()?;
                let name = self.child_name(&format!("{}s", determinant));
                Some(split_on(relation, determinant, &name))
            }
            NormalForm::Third | NormalForm::BoyceCodd => {
                let mut candidates: Vec<&str> =
                    violation.determinant.as_deref().into_iter().collect();
                for dependency in relation.dependencies.iter().filter(|d| !d.is_trivial()) {
                    let determinant = dependency.determinant.as_str();
                    if !relation.is_key(determinant) && !candidates.contains(&determinant) {
                        candidates.push(determinant);
                    }
                }
                self.split_on_first(relation, &candidates)
            }
            NormalForm::Fourth => {
                let determinant = violation.determinant.as_deref()?;
                let dependent = violation.dependent.as_deref()?;
                let name = self.child_name(&format!("{}_{}", determinant, dependent));
                Some(split_on_pair(relation, determinant, dependent, &name))
            }
            NormalForm::Fifth => {
                let [key] = relation.primary_key.as_slice() else {
                    return None;
                };
                let candidate = join_candidate(relation, sibling_keys)?;
                let name = self.child_name(&format!("{}_{}", key, candidate));
                Some(split_on_pair(relation, key, candidate, &name))
            }
            NormalForm::Unnormalized | NormalForm::First => None,
        }
    }

    /// Split on the first candidate determinant that yields a split.
    ///
    /// Fails with the first candidate's error when none does; `None` when
    /// there are no candidates at all.
    fn split_on_first(
        &mut self,
        relation: &Relation,
        candidates: &[&str],
    ) -> Option<Result<Split>> {
        let mut first_error = None;
        for determinant in candidates {
            let name = self.free_name(&format!("{}s", determinant));
            match split_on(relation, determinant, &name) {
                Ok(split) => {
                    self.names.insert(name);
                    return Some(Ok(split));
                }
                Err(err) => {
                    debug!(
                        relation = %relation.name,
                        determinant = %determinant,
                        error = %err,
                        "candidate rejected"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map(Err)
    }

    /// Reserve a relation name based on `base`.
    fn child_name(&mut self, base: &str) -> String {
        let name = self.free_name(base);
        self.names.insert(name.clone());
        name
    }

    /// `base`, suffixed `_2`, `_3`, ... until no fragment uses it.
    fn free_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 2;
        while self.names.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        name
    }

    // =========================================================================
    // 1NF repair
    // =========================================================================

    fn repair(&mut self, mut relation: Relation) -> Relation {
        let level = NormalForm::First;
        if check(level, &relation).is_none() {
            return relation;
        }

        let mut flattened = Vec::new();
        for attribute in relation.attributes.iter_mut().filter(|a| !a.is_atomic) {
            attribute.is_atomic = true;
            flattened.push(attribute.name.clone());
        }
        for name in flattened {
            self.record(Diagnostic::warning(
                DiagnosticKind::Repaired,
                &relation.name,
                level,
                format!("'{}' holds list values; each list is kept as one text value", name),
            ));
        }

        for (original, renamed) in rename_duplicates(&mut relation) {
            self.record(Diagnostic::info(
                DiagnosticKind::Repaired,
                &relation.name,
                level,
                format!("repeated column '{}' renamed to '{}'", original, renamed),
            ));
        }

        let before = relation.tuples.len();
        let mut seen = HashSet::new();
        relation.tuples.retain(|tuple| seen.insert(tuple.clone()));
        let dropped = before - relation.tuples.len();
        if dropped > 0 {
            self.record(Diagnostic::info(
                DiagnosticKind::Repaired,
                &relation.name,
                level,
                format!("dropped {} duplicate row(s)", dropped),
            ));
        }

        if let Some(mismatch) = find_type_mismatch(&relation) {
            self.record(Diagnostic::warning(
                DiagnosticKind::TypeMismatch,
                &relation.name,
                level,
                mismatch.message,
            ));
        }

        if relation.primary_key.is_empty() {
            relation.primary_key = match relation.dependencies.first() {
                Some(dependency) => vec![dependency.determinant.clone()],
                None => relation.attributes.iter().map(|a| a.name.clone()).collect(),
            };
            let message = format!(
                "no primary key declared; using ({})",
                relation.primary_key.join(", ")
            );
            self.record(Diagnostic::info(
                DiagnosticKind::Repaired,
                &relation.name,
                level,
                message,
            ));
        }

        if let Err(err) = relation.validate() {
            self.record(Diagnostic::warning(
                DiagnosticKind::Repaired,
                &relation.name,
                level,
                format!("repaired relation is still invalid: {}", err),
            ));
        }

        relation
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn stall(&mut self, relation: &Relation, level: NormalForm, message: impl Into<String>) {
        self.record(Diagnostic::warning(
            DiagnosticKind::DecompositionStalled,
            &relation.name,
            level,
            message,
        ));
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.contains(&diagnostic) {
            return;
        }
        match diagnostic.severity {
            Severity::Warning => warn!(
                relation = %diagnostic.relation,
                level = %diagnostic.level,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
            Severity::Info => info!(
                relation = %diagnostic.relation,
                level = %diagnostic.level,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            ),
        }
        self.diagnostics.push(diagnostic);
    }
}

/// A non-key attribute that looks like a reference to a sibling's key and
/// that no declared dependency explains.
fn join_candidate<'a>(relation: &'a Relation, sibling_keys: &HashSet<&str>) -> Option<&'a str> {
    relation
        .non_key_attributes()
        .map(|a| a.name.as_str())
        .find(|name| {
            sibling_keys.contains(name)
                && !relation.dependencies.iter().any(|d| d.determines(name))
        })
}

/// Rename every repeat of an attribute name to `Duplicate_<name>` (prefixed
/// again until unique) and copy the original's dependency edges onto it.
///
/// Returns `(original, renamed)` pairs in column order.
fn rename_duplicates(relation: &mut Relation) -> Vec<(String, String)> {
    let mut taken: HashSet<String> = relation.attributes.iter().map(|a| a.name.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut renamed = Vec::new();

    for attribute in relation.attributes.iter_mut() {
        if seen.insert(attribute.name.clone()) {
            continue;
        }
        let mut name = format!("{}{}", DUPLICATE_PREFIX, attribute.name);
        while taken.contains(&name) {
            name = format!("{}{}", DUPLICATE_PREFIX, name);
        }
        taken.insert(name.clone());
        seen.insert(name.clone());
        let original = std::mem::replace(&mut attribute.name, name.clone());
        renamed.push((original, name));
    }

    for (original, name) in &renamed {
        copy_edges(&mut relation.dependencies, original, name);
    }
    renamed
}

fn copy_edges(dependencies: &mut Vec<Dependency>, original: &str, renamed: &str) {
    let mut copies = Vec::new();
    for dependency in dependencies.iter_mut() {
        if dependency.determines(original) {
            dependency.dependents.insert(renamed.to_string());
        }
        if dependency.determinant == original {
            let dependents = dependency
                .dependents
                .iter()
                .filter(|d| d.as_str() != renamed)
                .cloned();
            copies.push(Dependency::new(renamed, dependents));
        }
    }
    dependencies.extend(copies.into_iter().filter(|d| !d.dependents.is_empty()));
}
