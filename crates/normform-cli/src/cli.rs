//! CLI argument definitions using clap.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use normform::input::parse_list_text;
use normform::{NormalForm, NormalFormRequest, NormalizerConfig, ParserConfig};

/// normform: classify tables by normal form and decompose them
#[derive(Parser)]
#[command(name = "normform")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report the highest normal form a sample table satisfies
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decompose a sample table until every fragment reaches a target
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        /// Target normal form (1NF, 2NF, 3NF, BCNF, 4NF, 5NF)
        #[arg(short, long, default_value = "3NF")]
        target: NormalForm,

        /// Current normal form, or "auto" to classify first
        #[arg(long, default_value = "auto")]
        current: NormalFormRequest,

        /// Write the CREATE TABLE script here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the normalization endpoint over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

/// Where the sample data, key and dependencies come from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to the sample data file (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Primary-key columns, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub keys: Vec<String>,

    /// File listing one primary-key column per line
    #[arg(long, value_name = "FILE")]
    pub keys_file: Option<PathBuf>,

    /// Functional dependency such as "Course -> Professor, CourseStart" (repeatable)
    #[arg(short, long = "dep", value_name = "DEPENDENCY")]
    pub dependencies: Vec<String>,

    /// File listing one dependency per line
    #[arg(long, value_name = "FILE")]
    pub deps_file: Option<PathBuf>,

    /// Name of the input relation
    #[arg(long, default_value = "R")]
    pub name: String,

    /// Field delimiter (auto-detected when omitted)
    #[arg(long)]
    pub delimiter: Option<char>,
}

impl InputArgs {
    /// Keys from `--keys` followed by those in `--keys-file`.
    pub fn all_keys(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        merge(&self.keys, self.keys_file.as_ref())
    }

    /// Dependencies from `--dep` followed by those in `--deps-file`.
    pub fn all_dependencies(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        merge(&self.dependencies, self.deps_file.as_ref())
    }

    /// Normalizer configuration carrying this input's parser settings.
    pub fn config(&self) -> Result<NormalizerConfig, Box<dyn std::error::Error>> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => return Err(format!("Delimiter must be a single ASCII character, got {:?}", c).into()),
            None => None,
        };

        Ok(NormalizerConfig {
            parser: ParserConfig {
                delimiter,
                ..ParserConfig::default()
            },
            relation_name: self.name.clone(),
            ..NormalizerConfig::default()
        })
    }
}

fn merge(
    inline: &[String],
    file: Option<&PathBuf>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut values: Vec<String> = inline
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        values.extend(parse_list_text(&text));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_arguments() {
        let cli = Cli::try_parse_from([
            "normform",
            "normalize",
            "students.csv",
            "--keys",
            "StudentID,Course",
            "--dep",
            "StudentID -> FirstName",
            "--dep",
            "Course -> Professor",
            "--target",
            "bcnf",
        ])
        .unwrap();

        match cli.command {
            Commands::Normalize {
                input,
                target,
                current,
                ..
            } => {
                assert_eq!(input.keys, vec!["StudentID", "Course"]);
                assert_eq!(input.dependencies.len(), 2);
                assert_eq!(target, NormalForm::BoyceCodd);
                assert_eq!(current, NormalFormRequest::Auto);
            }
            _ => panic!("expected normalize"),
        }
    }

    #[test]
    fn test_rejects_unknown_target() {
        let result = Cli::try_parse_from(["normform", "normalize", "a.csv", "--target", "6NF"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_keys_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.txt");
        fs::write(&path, "# key\nCourse\n").unwrap();

        let merged = merge(&["StudentID".to_string()], Some(&path)).unwrap();
        assert_eq!(merged, vec!["StudentID", "Course"]);
    }
}
