//! Lossless column projection of one relation into two.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::error::{NormalizeError, Result};
use crate::graph::descendants_where;
use crate::schema::{Dependency, Relation};

/// Smallest attribute count either side of a split may have.
pub const MIN_SPLIT_WIDTH: usize = 2;

/// The two relations produced by a split.
///
/// Both share exactly one column: the determinant the split was made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// The new relation holding the determinant and what it carries along.
    pub carried: Relation,
    /// The input relation minus the carried attributes, under its own name.
    pub remaining: Relation,
}

/// Split `relation` on `determinant`.
///
/// The carried side holds the determinant and every attribute reachable from
/// it through declared dependencies, keyed by the determinant. The descent
/// stops at primary-key attributes, which stay with the remaining side
/// together with the determinant as the shared column.
pub fn split_on(relation: &Relation, determinant: &str, child_name: &str) -> Result<Split> {
    if !relation.has_attribute(determinant) {
        return Err(NormalizeError::UnknownAttribute(determinant.to_string()));
    }

    let mut carried: IndexSet<&str> = IndexSet::new();
    carried.insert(determinant);
    carried.extend(descendants_where(
        determinant,
        &relation.dependencies,
        |name| name == determinant || !relation.is_key(name),
    ));

    partition(
        relation,
        determinant,
        child_name,
        |name| carried.contains(name),
        vec![determinant.to_string()],
    )
}

/// Split off exactly `{determinant, dependent}`, keyed by both.
///
/// The dependent leaves the remaining side. Used where the evidence is a
/// pair rather than a dependency chain: multi-valued dependencies and
/// join-dependency candidates.
pub fn split_on_pair(
    relation: &Relation,
    determinant: &str,
    dependent: &str,
    child_name: &str,
) -> Result<Split> {
    for name in [determinant, dependent] {
        if !relation.has_attribute(name) {
            return Err(NormalizeError::UnknownAttribute(name.to_string()));
        }
    }
    // Moving a key attribute out would leave the remaining key dangling.
    if determinant == dependent || relation.is_key(dependent) {
        return Err(NormalizeError::UnsplittableRelation {
            relation: relation.name.clone(),
            determinant: determinant.to_string(),
        });
    }

    partition(
        relation,
        determinant,
        child_name,
        |name| name == determinant || name == dependent,
        vec![determinant.to_string(), dependent.to_string()],
    )
}

fn partition<F>(
    relation: &Relation,
    determinant: &str,
    child_name: &str,
    is_carried: F,
    carried_key: Vec<String>,
) -> Result<Split>
where
    F: Fn(&str) -> bool,
{
    let (carried_cols, remaining_cols): (Vec<usize>, Vec<usize>) = (0..relation.attribute_count())
        .partition(|&i| is_carried(&relation.attributes[i].name));

    let shared = relation
        .attribute_index(determinant)
        .ok_or_else(|| NormalizeError::UnknownAttribute(determinant.to_string()))?;
    let mut remaining_cols = remaining_cols;
    if !remaining_cols.contains(&shared) {
        remaining_cols.push(shared);
        remaining_cols.sort_unstable();
    }

    if carried_cols.len() < MIN_SPLIT_WIDTH || remaining_cols.len() < MIN_SPLIT_WIDTH {
        return Err(NormalizeError::UnsplittableRelation {
            relation: relation.name.clone(),
            determinant: determinant.to_string(),
        });
    }

    let carried = project(relation, child_name, &carried_cols, carried_key)?;
    let remaining = project(
        relation,
        &relation.name,
        &remaining_cols,
        relation.primary_key.clone(),
    )?;

    Ok(Split { carried, remaining })
}

/// Copy the given columns into a fresh relation.
fn project(
    relation: &Relation,
    name: &str,
    columns: &[usize],
    primary_key: Vec<String>,
) -> Result<Relation> {
    let attributes = columns
        .iter()
        .map(|&i| relation.attributes[i].clone())
        .collect();

    let tuples = relation
        .tuples
        .iter()
        .map(|tuple| columns.iter().map(|&i| tuple[i].clone()).collect())
        .collect();

    let names: HashSet<&str> = columns
        .iter()
        .map(|&i| relation.attributes[i].name.as_str())
        .collect();
    let dependencies = relation
        .dependencies
        .iter()
        .filter_map(|d| restrict(d, &names))
        .collect();

    Relation::new(name, attributes, tuples, primary_key, dependencies)
}

/// The part of `dependency` whose ends are both in `names`.
fn restrict(dependency: &Dependency, names: &HashSet<&str>) -> Option<Dependency> {
    if !names.contains(dependency.determinant.as_str()) {
        return None;
    }
    let dependents: IndexSet<String> = dependency
        .dependents
        .iter()
        .filter(|d| **d != dependency.determinant && names.contains(d.as_str()))
        .cloned()
        .collect();

    (!dependents.is_empty()).then(|| Dependency {
        determinant: dependency.determinant.clone(),
        dependents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, DataType};

    fn course_relation() -> Relation {
        let attributes = ["Course", "Professor", "ProfessorEmail", "CourseStart", "CourseEnd"]
            .iter()
            .map(|n| Attribute::new(*n, DataType::VarChar(50)))
            .collect();
        let tuples = vec![
            vec!["Math101", "Dr.Smith", "smith@mst.edu", "Jan", "May"],
            vec!["CS101", "Dr.Jones", "jones@mst.edu", "Feb", "Jun"],
            vec!["Art101", "Dr.Smith", "smith@mst.edu", "Jan", "May"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();

        Relation::new(
            "Course",
            attributes,
            tuples,
            vec!["Course".to_string()],
            vec![
                Dependency::new("Course", ["CourseStart", "CourseEnd", "Professor"]),
                Dependency::new("Professor", ["ProfessorEmail"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_split_on_non_key_determinant() {
        let relation = course_relation();
        let split = split_on(&relation, "Professor", "Professors").unwrap();

        assert_eq!(split.carried.name, "Professors");
        assert_eq!(split.carried.attribute_names(), vec!["Professor", "ProfessorEmail"]);
        assert_eq!(split.carried.primary_key, vec!["Professor"]);
        assert_eq!(
            split.carried.dependencies,
            vec![Dependency::new("Professor", ["ProfessorEmail"])]
        );

        assert_eq!(split.remaining.name, "Course");
        assert_eq!(
            split.remaining.attribute_names(),
            vec!["Course", "Professor", "CourseStart", "CourseEnd"]
        );
        assert_eq!(split.remaining.primary_key, vec!["Course"]);
        assert_eq!(
            split.remaining.dependencies,
            vec![Dependency::new("Course", ["CourseStart", "CourseEnd", "Professor"])]
        );
    }

    #[test]
    fn test_split_conserves_rows_and_attributes() {
        let relation = course_relation();
        let split = split_on(&relation, "Professor", "Professors").unwrap();

        assert_eq!(split.carried.row_count(), relation.row_count());
        assert_eq!(split.remaining.row_count(), relation.row_count());

        let carried: HashSet<&str> = split.carried.attribute_names().into_iter().collect();
        let remaining: HashSet<&str> = split.remaining.attribute_names().into_iter().collect();
        let original: HashSet<&str> = relation.attribute_names().into_iter().collect();
        assert_eq!(&carried | &remaining, original);
        assert_eq!(
            carried.intersection(&remaining).copied().collect::<Vec<_>>(),
            vec!["Professor"]
        );

        assert_eq!(split.carried.tuples[1], vec!["Dr.Jones", "jones@mst.edu"]);
        assert_eq!(split.remaining.tuples[2], vec!["Art101", "Dr.Smith", "Jan", "May"]);
    }

    #[test]
    fn test_split_does_not_alias_input() {
        let relation = course_relation();
        let mut split = split_on(&relation, "Professor", "Professors").unwrap();
        split.carried.tuples[0][0] = "changed".to_string();
        assert_eq!(relation.tuples[0][1], "Dr.Smith");
        assert_eq!(split.remaining.tuples[0][1], "Dr.Smith");
    }

    #[test]
    fn test_split_on_key_is_unsplittable() {
        let relation = course_relation();
        let err = split_on(&relation, "Course", "Courses").unwrap_err();
        assert!(matches!(err, NormalizeError::UnsplittableRelation { .. }));
    }

    #[test]
    fn test_split_on_leaf_is_unsplittable() {
        let relation = course_relation();
        let err = split_on(&relation, "CourseEnd", "CourseEnds").unwrap_err();
        assert!(matches!(err, NormalizeError::UnsplittableRelation { .. }));
    }

    #[test]
    fn test_split_on_unknown_attribute() {
        let relation = course_relation();
        let err = split_on(&relation, "Room", "Rooms").unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownAttribute(name) if name == "Room"));
    }

    #[test]
    fn test_split_on_pair() {
        let relation = course_relation();
        let split = split_on_pair(&relation, "Course", "Professor", "Course_Professor").unwrap();

        assert_eq!(split.carried.attribute_names(), vec!["Course", "Professor"]);
        assert_eq!(split.carried.primary_key, vec!["Course", "Professor"]);
        assert_eq!(
            split.carried.dependencies,
            vec![Dependency::new("Course", ["Professor"])]
        );
        assert!(!split.remaining.has_attribute("Professor"));
        // The Professor -> ProfessorEmail edge lost its determinant on both sides.
        assert!(split.remaining.dependencies.iter().all(|d| d.determinant == "Course"));
    }

    #[test]
    fn test_split_on_pair_rejects_key_dependent() {
        let relation = course_relation();
        let err = split_on_pair(&relation, "Professor", "Course", "x").unwrap_err();
        assert!(matches!(err, NormalizeError::UnsplittableRelation { .. }));
    }
}
