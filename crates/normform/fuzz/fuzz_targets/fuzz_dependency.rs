//! Fuzz target for dependency parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use normform::{Attribute, DataType, Relation, parse_dependency};

fuzz_target!(|input: &str| {
    if input.len() > 10_000 {
        return;
    }

    let relation = Relation::new_unchecked(
        "R",
        vec![
            Attribute::new("A", DataType::Integer),
            Attribute::new("B", DataType::VarChar(10)),
            Attribute::new("C", DataType::VarChar(10)),
        ],
        vec![],
        vec!["A".to_string()],
        vec![],
    );

    if let Ok(dependency) = parse_dependency(input, &relation) {
        assert!(relation.has_attribute(&dependency.determinant));
        assert!(!dependency.dependents.is_empty());
    }
});
