//! Classify command - report the normal form of a sample table.

use colored::Colorize;
use normform::{NormalForm, Relation};

use super::load_input;
use crate::cli::InputArgs;

pub fn run(
    input: InputArgs,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = input.config()?;
    let (normalizer, relation, source) = load_input(&input, config)?;
    let classification = normalizer.analyze(&relation);

    if json_output {
        let status = serde_json::json!({
            "file": source.file,
            "relation": relation.name,
            "attributes": relation.attribute_count(),
            "rows": relation.row_count(),
            "primary_key": relation.primary_key,
            "dependencies": relation.dependencies.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "normal_form": classification.normal_form,
            "violation": classification.violation,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Classifying".cyan().bold(),
        source.file.white()
    );
    println!(
        "  {} columns, {} rows, {} dependencies",
        relation.attribute_count(),
        relation.row_count(),
        relation.dependencies.len()
    );
    println!();

    if verbose {
        print_schema(&relation);
    }

    let label = classification.normal_form.to_string();
    let colored_label = match classification.normal_form {
        NormalForm::Unnormalized => label.red().bold(),
        NormalForm::First | NormalForm::Second => label.yellow().bold(),
        _ => label.green().bold(),
    };
    println!("Normal form: {}", colored_label);

    match classification.violation {
        Some(violation) => {
            println!(
                "{} {}",
                format!("Fails {}:", violation.level).yellow(),
                violation.message
            );
        }
        None => println!("{}", "No violations found.".green()),
    }

    Ok(())
}

fn print_schema(relation: &Relation) {
    println!("{}", "Schema:".yellow().bold());
    for attribute in &relation.attributes {
        let marker = if relation.is_key(&attribute.name) {
            "*".cyan().bold().to_string()
        } else {
            " ".to_string()
        };
        let atomic = if attribute.is_atomic {
            String::new()
        } else {
            " (non-atomic)".red().to_string()
        };
        println!("  {} {} {}{}", marker, attribute.name, attribute.data_type.to_string().dimmed(), atomic);
    }

    if !relation.dependencies.is_empty() {
        println!("{}", "Dependencies:".yellow().bold());
        for dependency in &relation.dependencies {
            println!("  {}", dependency);
        }
    }
    println!();
}
