//! Functional dependency declarations.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A functional dependency `determinant -> dependents`.
///
/// Determinants are always a single attribute. Dependents keep their
/// declared order for display, but equality treats them as a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The determining attribute.
    pub determinant: String,
    /// Attributes determined by `determinant`.
    pub dependents: IndexSet<String>,
}

impl Dependency {
    /// Create a dependency from a determinant and its dependents.
    pub fn new<I, S>(determinant: impl Into<String>, dependents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            determinant: determinant.into(),
            dependents: dependents.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` is one of the dependents.
    pub fn determines(&self, name: &str) -> bool {
        self.dependents.contains(name)
    }

    /// Whether the dependency only restates `X -> X`.
    pub fn is_trivial(&self) -> bool {
        self.dependents.iter().all(|d| *d == self.determinant)
    }

    /// All attribute names referenced, determinant first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.determinant.as_str()).chain(self.dependents.iter().map(String::as_str))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependents: Vec<&str> = self.dependents.iter().map(String::as_str).collect();
        write!(f, "{} -> {}", self.determinant, dependents.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependents_compare_as_set() {
        let a = Dependency::new("Course", ["CourseStart", "CourseEnd"]);
        let b = Dependency::new("Course", ["CourseEnd", "CourseStart"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let dep = Dependency::new("Professor", ["ProfessorEmail", "Office"]);
        assert_eq!(dep.to_string(), "Professor -> ProfessorEmail, Office");
        assert!(dep.determines("Office"));
        assert!(!dep.determines("Professor"));
    }

    #[test]
    fn test_self_reference_is_trivial() {
        assert!(Dependency::new("A", ["A"]).is_trivial());
        assert!(!Dependency::new("A", ["A", "B"]).is_trivial());
    }
}
