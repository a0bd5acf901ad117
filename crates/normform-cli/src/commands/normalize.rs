//! Normalize command - decompose a sample table to a target normal form.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use normform::{NormalForm, NormalFormRequest, NormalizationReport, NormalizerConfig, Severity};

use super::load_input;
use crate::cli::InputArgs;

pub fn run(
    input: InputArgs,
    target: NormalForm,
    current: NormalFormRequest,
    output: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = NormalizerConfig {
        target,
        current,
        ..input.config()?
    };
    let (normalizer, relation, source) = load_input(&input, config)?;

    let mut report = normalizer.run(relation);
    report.source = Some(source);

    if let Some(path) = &output {
        fs::write(path, format!("{}\n", report.ddl_script()))
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, verbose);

    match &output {
        Some(path) => println!(
            "{} {}",
            "DDL written to".green().bold(),
            path.display().to_string().white()
        ),
        None => {
            println!();
            println!("{}", report.ddl_script());
        }
    }

    Ok(())
}

fn print_report(report: &NormalizationReport, verbose: bool) {
    let file = report
        .source
        .as_ref()
        .map(|s| s.file.as_str())
        .unwrap_or(report.input.relation.as_str());

    println!("{} {}", "Normalizing".cyan().bold(), file.white());
    println!(
        "  Detected {}, starting from {}, target {}",
        report.detected_normal_form.to_string().bold(),
        report.current_normal_form.to_string().bold(),
        report.target_normal_form.to_string().bold()
    );
    if verbose {
        if let Some(violation) = &report.violation {
            println!("  {}", violation.message.dimmed());
        }
    }
    println!();

    println!(
        "{} ({})",
        "Relations:".yellow().bold(),
        report.fragments.len()
    );
    for fragment in &report.fragments {
        let label = fragment.normal_form.to_string();
        let label = if fragment.normal_form >= report.target_normal_form {
            label.green()
        } else {
            label.red()
        };
        println!(
            "  {} [{}] key ({}) {}",
            fragment.relation.name.white().bold(),
            label,
            fragment.relation.primary_key.join(", "),
            fragment.relation.attribute_names().join(", ").dimmed()
        );
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("{}", "Diagnostics:".yellow().bold());
        for diagnostic in &report.diagnostics {
            let severity = match diagnostic.severity {
                Severity::Warning => diagnostic.severity.label().yellow(),
                Severity::Info => diagnostic.severity.label().blue(),
            };
            println!(
                "  {} {} ({}): {}",
                severity, diagnostic.relation, diagnostic.level, diagnostic.message
            );
        }
    }
}
