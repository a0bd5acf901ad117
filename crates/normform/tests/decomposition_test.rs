//! End-to-end decompositions of the student/course sample.

mod common;

use std::collections::BTreeSet;

use common::*;
use normform::{
    DiagnosticKind, NormalForm, Normalizer, Relation, ViolationKind, classify,
    determine_normal_form, normalize,
};

fn student_relation() -> Relation {
    Normalizer::new()
        .load_str(STUDENT_COURSES, &student_keys(), &student_dependencies())
        .expect("fixture should load")
}

fn names(relations: &[Relation]) -> Vec<&str> {
    relations.iter().map(|r| r.name.as_str()).collect()
}

/// Every fragment reaches the target, no column is lost, each fragment holds
/// the distinct projection of the input, and joining them gives the input back.
fn assert_lossless(input: &Relation, fragments: &[Relation], target: NormalForm) {
    for fragment in fragments {
        assert!(
            determine_normal_form(fragment) >= target,
            "{} is below {}",
            fragment.name,
            target
        );
        assert!(fragment.validate().is_ok());
    }

    let input_names: BTreeSet<&str> = input.attribute_names().into_iter().collect();
    let fragment_names: BTreeSet<&str> = fragments
        .iter()
        .flat_map(|f| f.attribute_names())
        .collect();
    assert_eq!(input_names, fragment_names);

    let input_rows = row_set(input);
    for fragment in fragments {
        let projected: BTreeSet<Row> = input_rows
            .iter()
            .map(|row| {
                fragment
                    .attribute_names()
                    .into_iter()
                    .map(|name| (name.to_string(), row[name].clone()))
                    .collect()
            })
            .collect();
        assert_eq!(projected.len(), fragment.row_count(), "{}", fragment.name);
        assert_eq!(projected, row_set(fragment), "{}", fragment.name);
    }

    assert_eq!(rejoin(fragments), input_rows);
}

#[test]
fn test_sample_classifies_as_first() {
    let relation = student_relation();
    let classification = classify(&relation);

    assert_eq!(classification.normal_form, NormalForm::First);
    let violation = classification.violation.unwrap();
    assert_eq!(violation.kind, ViolationKind::PartialDependency);
    assert_eq!(violation.determinant.as_deref(), Some("StudentID"));
}

#[test]
fn test_second_normal_form() {
    let relation = student_relation();
    let result = normalize(relation.clone(), NormalForm::Second, None);

    assert_eq!(names(&result.relations), vec!["R", "Courses", "StudentIDs"]);
    assert_eq!(
        result.relations[0].attribute_names(),
        vec!["StudentID", "Course"]
    );
    assert_eq!(
        result.relations[1].attribute_names(),
        vec!["Course", "CourseStart", "CourseEnd", "Professor", "ProfessorEmail"]
    );
    assert_eq!(result.relations[1].primary_key, vec!["Course"]);
    assert_eq!(result.relations[1].row_count(), 3);
    assert_eq!(
        result.relations[2].attribute_names(),
        vec!["StudentID", "FirstName", "LastName"]
    );

    assert!(result.is_complete());
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Repaired && d.relation == "Courses")
    );
    assert_lossless(&relation, &result.relations, NormalForm::Second);
}

#[test]
fn test_third_normal_form() {
    let relation = student_relation();
    let result = normalize(relation.clone(), NormalForm::Third, None);

    assert_eq!(
        names(&result.relations),
        vec!["R", "Courses", "Professors", "StudentIDs"]
    );
    assert_eq!(
        result.relations[1].attribute_names(),
        vec!["Course", "CourseStart", "CourseEnd", "Professor"]
    );
    let professors = &result.relations[2];
    assert_eq!(professors.attribute_names(), vec!["Professor", "ProfessorEmail"]);
    assert_eq!(professors.primary_key, vec!["Professor"]);
    assert_eq!(professors.row_count(), 2);

    assert!(result.is_complete());
    assert_lossless(&relation, &result.relations, NormalForm::Third);
}

#[test]
fn test_boyce_codd_normal_form() {
    let relation = student_relation();
    let result = normalize(relation.clone(), NormalForm::BoyceCodd, None);

    assert_eq!(
        names(&result.relations),
        vec!["R", "Courses", "Professors", "StudentIDs"]
    );
    assert!(result.is_complete());
    assert_lossless(&relation, &result.relations, NormalForm::BoyceCodd);
}

#[test]
fn test_fourth_normal_form() {
    let relation = student_relation();
    let result = normalize(relation.clone(), NormalForm::Fourth, None);

    assert_eq!(result.relations.len(), 4);
    assert!(result.is_complete());
    assert_lossless(&relation, &result.relations, NormalForm::Fourth);
}

#[test]
fn test_fifth_normal_form() {
    let relation = student_relation();
    let result = normalize(relation.clone(), NormalForm::Fifth, None);

    assert_eq!(result.relations.len(), 4);
    assert!(result.is_complete());
    assert_lossless(&relation, &result.relations, NormalForm::Fifth);
}

#[test]
fn test_higher_targets_refine_lower_ones() {
    let relation = student_relation();
    let second = normalize(relation.clone(), NormalForm::Second, None);
    let third = normalize(relation, NormalForm::Third, None);

    // Every 3NF fragment's columns sit inside some 2NF fragment.
    for fragment in &third.relations {
        let columns: BTreeSet<&str> = fragment.attribute_names().into_iter().collect();
        assert!(second.relations.iter().any(|coarse| {
            let coarse: BTreeSet<&str> = coarse.attribute_names().into_iter().collect();
            columns.is_subset(&coarse)
        }));
    }
}
