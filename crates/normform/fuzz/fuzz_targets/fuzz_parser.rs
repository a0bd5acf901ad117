//! Fuzz target for the sample-data parser and type inference.
//!
//! Arbitrary text must never panic the parser, the relation builder or the
//! classifier.

#![no_main]

use libfuzzer_sys::fuzz_target;
use normform::{Parser, RelationBuilder, classify};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parser = Parser::new();
    if let Ok(table) = parser.parse_str(text) {
        let keys: Vec<String> = table.headers.iter().take(1).cloned().collect();
        if let Ok(relation) = RelationBuilder::default().build(&table, &keys) {
            let _ = classify(&relation);
        }
    }
});
