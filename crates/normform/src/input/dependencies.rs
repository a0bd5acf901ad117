//! Parsing of `X -> Y, Z` dependency declarations.

use crate::error::{NormalizeError, Result};
use crate::schema::{Dependency, Relation};

/// Arrow separating determinant from dependents.
const ARROW: &str = "->";

/// Parse one declaration against the attributes of `relation`.
///
/// The determinant must be a single attribute; chained declarations such as
/// `X -> Y -> Z` have to be given as separate strings.
pub fn parse_dependency(input: &str, relation: &Relation) -> Result<Dependency> {
    let malformed = |reason: String| NormalizeError::MalformedDependency {
        input: input.to_string(),
        reason,
    };

    let parts: Vec<&str> = input.split(ARROW).collect();
    match parts.len() {
        1 => return Err(malformed("expected the form 'X -> Y, Z'".to_string())),
        2 => {}
        _ => {
            return Err(malformed(
                "chained dependencies are not supported, declare each link separately".to_string(),
            ));
        }
    }

    let determinant = parts[0].trim();
    if determinant.is_empty() {
        return Err(malformed("missing determinant".to_string()));
    }
    if determinant.contains(',') {
        return Err(malformed(
            "composite determinants are not supported".to_string(),
        ));
    }

    let dependents: Vec<&str> = parts[1]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if dependents.is_empty() {
        return Err(malformed("missing dependents".to_string()));
    }

    if let Some(unknown) = std::iter::once(determinant)
        .chain(dependents.iter().copied())
        .find(|name| !relation.has_attribute(name))
    {
        return Err(malformed(format!(
            "'{}' is not a column of the sample data",
            unknown
        )));
    }

    // X -> X holds trivially and says nothing about the key.
    let dependents: Vec<&str> = dependents
        .into_iter()
        .filter(|name| *name != determinant)
        .collect();
    if dependents.is_empty() {
        return Err(malformed(format!(
            "'{}' cannot depend only on itself",
            determinant
        )));
    }

    Ok(Dependency::new(determinant, dependents))
}

/// Parse every declaration, failing on the first malformed one.
pub fn parse_dependencies<S: AsRef<str>>(inputs: &[S], relation: &Relation) -> Result<Vec<Dependency>> {
    inputs
        .iter()
        .map(|input| parse_dependency(input.as_ref(), relation))
        .collect()
}

/// Split the one-item-per-line text format used for key and dependency lists.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_list_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, DataType};

    fn relation() -> Relation {
        let attributes = ["Course", "Professor", "ProfessorEmail", "CourseStart"]
            .iter()
            .map(|n| Attribute::new(*n, DataType::VarChar(50)))
            .collect();
        Relation::new("R", attributes, vec![], vec!["Course".to_string()], vec![]).unwrap()
    }

    #[test]
    fn test_parse_single() {
        let dep = parse_dependency("Course -> CourseStart, Professor", &relation()).unwrap();
        assert_eq!(dep.determinant, "Course");
        assert_eq!(dep, Dependency::new("Course", ["Professor", "CourseStart"]));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let dep = parse_dependency("  Professor->ProfessorEmail ", &relation()).unwrap();
        assert_eq!(dep.to_string(), "Professor -> ProfessorEmail");
    }

    #[test]
    fn test_missing_arrow() {
        let err = parse_dependency("Course CourseStart", &relation()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedDependency { .. }));
    }

    #[test]
    fn test_chained_rejected() {
        let err = parse_dependency("Course -> Professor -> ProfessorEmail", &relation()).unwrap_err();
        assert!(err.to_string().contains("chained"));
    }

    #[test]
    fn test_unknown_attribute() {
        let err = parse_dependency("Course -> Room", &relation()).unwrap_err();
        assert!(err.to_string().contains("'Room'"));
    }

    #[test]
    fn test_composite_determinant_rejected() {
        let err = parse_dependency("Course, Professor -> CourseStart", &relation()).unwrap_err();
        assert!(err.to_string().contains("composite"));
    }

    #[test]
    fn test_self_reference_is_dropped() {
        let dep =
            parse_dependency("Professor -> Professor, ProfessorEmail", &relation()).unwrap();
        assert_eq!(dep, Dependency::new("Professor", ["ProfessorEmail"]));

        let err = parse_dependency("Professor -> Professor", &relation()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedDependency { .. }));
        assert!(err.to_string().contains("itself"));
    }

    #[test]
    fn test_parse_dependencies_stops_at_first_error() {
        let inputs = ["Course -> CourseStart", "nonsense"];
        assert!(parse_dependencies(&inputs, &relation()).is_err());
        assert_eq!(parse_dependencies(&inputs[..1], &relation()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_list_text() {
        let lines = parse_list_text("# keys\nCourse\n\n  Professor  \n");
        assert_eq!(lines, vec!["Course", "Professor"]);
    }
}
