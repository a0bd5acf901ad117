//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use tempfile::NamedTempFile;

use normform::Relation;

/// Students enrolled in courses, keyed by (StudentID, Course).
pub const STUDENT_COURSES: &str = "\
StudentID,FirstName,LastName,Course,CourseStart,CourseEnd,Professor,ProfessorEmail
101,John,Doe,Math101,1/1/2023,5/30/2023,Dr.Smith,smith@mst.edu
102,Jane,Roe,Math101,1/1/2023,5/30/2023,Dr.Smith,smith@mst.edu
103,Arindam,Khanda,CS101,1/15/2023,5/10/2023,Dr.Jones,jones@mst.edu
104,Jose,Franklin,Bio101,1/10/2023,5/15/2023,Dr.Smith,smith@mst.edu
105,Ada,Lovelace,CS101,1/15/2023,5/10/2023,Dr.Jones,jones@mst.edu
";

pub fn student_keys() -> Vec<String> {
    strings(&["StudentID", "Course"])
}

pub fn student_dependencies() -> Vec<String> {
    strings(&[
        "StudentID -> FirstName, LastName",
        "Course -> CourseStart, CourseEnd, Professor",
        "Professor -> ProfessorEmail",
    ])
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Helper to create a temporary file with given content.
pub fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

pub type Row = BTreeMap<String, String>;

/// Rows keyed by column name, as a set.
pub fn row_set(relation: &Relation) -> BTreeSet<Row> {
    relation
        .tuples
        .iter()
        .map(|tuple| {
            relation
                .attributes
                .iter()
                .zip(tuple)
                .map(|(a, v)| (a.name.clone(), v.clone()))
                .collect()
        })
        .collect()
}

/// Natural join of two row sets over their shared column names.
pub fn natural_join(left: &BTreeSet<Row>, right: &BTreeSet<Row>) -> BTreeSet<Row> {
    let mut joined = BTreeSet::new();
    for l in left {
        for r in right {
            let agrees = l
                .iter()
                .all(|(name, value)| r.get(name).is_none_or(|other| other == value));
            if agrees {
                let mut row = l.clone();
                row.extend(r.iter().map(|(k, v)| (k.clone(), v.clone())));
                joined.insert(row);
            }
        }
    }
    joined
}

/// Join every fragment back together, in order.
pub fn rejoin(fragments: &[Relation]) -> BTreeSet<Row> {
    let mut iter = fragments.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    iter.fold(row_set(first), |acc, fragment| natural_join(&acc, &row_set(fragment)))
}
