//! Fuzz target for the decomposition engine.
//!
//! Builds a small relation from arbitrary rows and dependencies and checks
//! that normalization terminates without losing attributes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use normform::{Attribute, DataType, Dependency, NormalForm, Relation, normalize};

const COLUMNS: [&str; 5] = ["A", "B", "C", "D", "E"];

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<[u8; 5]>,
    edges: Vec<(u8, u8)>,
    key_width: u8,
    target: u8,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 64 || input.edges.len() > 16 {
        return;
    }

    let attributes: Vec<Attribute> = COLUMNS
        .iter()
        .map(|name| Attribute::new(*name, DataType::Integer))
        .collect();
    let tuples: Vec<Vec<String>> = input
        .rows
        .iter()
        .map(|row| row.iter().map(|v| (v % 4).to_string()).collect())
        .collect();
    let key_width = 1 + (input.key_width as usize % 2);
    let primary_key: Vec<String> = COLUMNS[..key_width].iter().map(|c| c.to_string()).collect();
    let dependencies: Vec<Dependency> = input
        .edges
        .iter()
        .map(|(from, to)| (COLUMNS[*from as usize % 5], COLUMNS[*to as usize % 5]))
        .filter(|(from, to)| from != to)
        .map(|(from, to)| Dependency::new(from, [to]))
        .collect();

    let Ok(relation) = Relation::new("R", attributes, tuples, primary_key, dependencies) else {
        return;
    };

    let target = NormalForm::from_rank(1 + input.target % 6).unwrap_or(NormalForm::Third);
    let result = normalize(relation, target, None);

    for name in COLUMNS {
        assert!(result.relations.iter().any(|r| r.has_attribute(name)));
    }
});
