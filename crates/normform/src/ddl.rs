//! SQL `CREATE TABLE` rendering for decomposed relations.
//!
//! Shared determinant columns are not emitted as `FOREIGN KEY` constraints;
//! only primary keys are declared.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::Relation;

/// Identifiers that can be written without quoting.
static BARE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Render one `CREATE TABLE` statement.
pub fn create_table(relation: &Relation) -> String {
    let mut lines: Vec<String> = relation
        .attributes
        .iter()
        .map(|a| format!("    {} {}", quote_identifier(&a.name), a.data_type.sql()))
        .collect();

    if !relation.primary_key.is_empty() {
        let key: Vec<String> = relation
            .primary_key
            .iter()
            .map(|k| quote_identifier(k))
            .collect();
        lines.push(format!("    PRIMARY KEY ({})", key.join(", ")));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_identifier(&relation.name),
        lines.join(",\n")
    )
}

fn quote_identifier(name: &str) -> String {
    if BARE_IDENTIFIER.is_match(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, DataType, Dependency};

    #[test]
    fn test_create_table() {
        let relation = Relation::new(
            "Professors",
            vec![
                Attribute::new("Professor", DataType::VarChar(50)),
                Attribute::new("ProfessorEmail", DataType::VarChar(50)),
                Attribute::new("Hired", DataType::DateTime),
            ],
            vec![],
            vec!["Professor".to_string()],
            vec![Dependency::new("Professor", ["ProfessorEmail", "Hired"])],
        )
        .unwrap();

        assert_eq!(
            create_table(&relation),
            "CREATE TABLE Professors (\n    Professor varchar(50),\n    ProfessorEmail varchar(50),\n    Hired datetime,\n    PRIMARY KEY (Professor)\n);"
        );
    }

    #[test]
    fn test_composite_key_and_quoting() {
        let relation = Relation::new(
            "Course Roster",
            vec![
                Attribute::new("Student ID", DataType::Integer),
                Attribute::new("Course", DataType::VarChar(50)),
            ],
            vec![],
            vec!["Student ID".to_string(), "Course".to_string()],
            vec![],
        )
        .unwrap();

        let ddl = create_table(&relation);
        assert!(ddl.starts_with("CREATE TABLE \"Course Roster\" ("));
        assert!(ddl.contains("    \"Student ID\" int,"));
        assert!(ddl.contains("PRIMARY KEY (\"Student ID\", Course)"));
    }

    #[test]
    fn test_no_key_clause_without_key() {
        let relation = Relation::new(
            "R",
            vec![Attribute::new("A", DataType::Bit)],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(create_table(&relation), "CREATE TABLE R (\n    A bit(1)\n);");
    }
}
