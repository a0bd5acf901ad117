//! The `Normalizer` facade: load sample data, classify it, decompose it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ddl::create_table;
use crate::decompose::{Diagnostic, normalize};
use crate::error::Result;
use crate::inference::{DEFAULT_RELATION_NAME, RelationBuilder};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata, parse_dependencies};
use crate::normal_form::{
    Classification, NormalForm, NormalFormRequest, Violation, classify, determine_normal_form,
};
use crate::schema::Relation;

/// Configuration for a normalization run.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Name given to the relation built from the sample data.
    pub relation_name: String,
    /// Level every fragment should reach.
    pub target: NormalForm,
    /// Level the input is declared to be at (`auto` = classify).
    pub current: NormalFormRequest,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            relation_name: DEFAULT_RELATION_NAME.to_string(),
            target: NormalForm::Third,
            current: NormalFormRequest::Auto,
        }
    }
}

/// Shape of the relation that went in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSummary {
    pub relation: String,
    pub attributes: usize,
    pub rows: usize,
    pub dependencies: usize,
    pub primary_key: Vec<String>,
}

impl InputSummary {
    fn of(relation: &Relation) -> Self {
        Self {
            relation: relation.name.clone(),
            attributes: relation.attribute_count(),
            rows: relation.row_count(),
            dependencies: relation.dependencies.len(),
            primary_key: relation.primary_key.clone(),
        }
    }
}

/// One output relation with its classification and DDL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub relation: Relation,
    pub normal_form: NormalForm,
    pub ddl: String,
}

impl Fragment {
    fn new(relation: Relation) -> Self {
        let normal_form = determine_normal_form(&relation);
        let ddl = create_table(&relation);
        Self {
            relation,
            normal_form,
            ddl,
        }
    }
}

/// Result of a normalization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Metadata about the sample file, when the input came from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub input: InputSummary,
    /// Level the classifier found.
    pub detected_normal_form: NormalForm,
    /// First violation that kept the input below 5NF.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
    /// Level decomposition started from.
    pub current_normal_form: NormalForm,
    pub target_normal_form: NormalForm,
    pub fragments: Vec<Fragment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizationReport {
    /// All `CREATE TABLE` statements, separated by blank lines.
    pub fn ddl_script(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.ddl.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whether any diagnostic is a warning.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_warning)
    }
}

/// Loads sample data into relations and normalizes them.
pub struct Normalizer {
    config: NormalizerConfig,
    parser: Parser,
    builder: RelationBuilder,
}

impl Normalizer {
    /// Create a normalizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Create a normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let builder = RelationBuilder::new(config.relation_name.clone());
        Self {
            config,
            parser,
            builder,
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Read a sample file and build its relation.
    ///
    /// Key and dependency errors abort before any relation is returned.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        keys: &[String],
        dependencies: &[String],
    ) -> Result<(Relation, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        let relation = self.build(&table, keys, dependencies)?;
        Ok((relation, source))
    }

    /// Build a relation from in-memory sample text.
    pub fn load_str(&self, text: &str, keys: &[String], dependencies: &[String]) -> Result<Relation> {
        let table = self.parser.parse_str(text)?;
        self.build(&table, keys, dependencies)
    }

    fn build(&self, table: &DataTable, keys: &[String], dependencies: &[String]) -> Result<Relation> {
        let relation = self.builder.build(table, keys)?;
        let dependencies = parse_dependencies(dependencies, &relation)?;
        relation.with_dependencies(dependencies)
    }

    /// Classify without decomposing.
    pub fn analyze(&self, relation: &Relation) -> Classification {
        classify(relation)
    }

    /// Classify and decompose a relation to the configured target.
    pub fn run(&self, relation: Relation) -> NormalizationReport {
        let classification = classify(&relation);
        let current = self
            .config
            .current
            .level()
            .unwrap_or(classification.normal_form);
        let input = InputSummary::of(&relation);

        let decomposition = normalize(relation, self.config.target, Some(current));
        let fragments: Vec<Fragment> = decomposition
            .relations
            .into_iter()
            .map(Fragment::new)
            .collect();

        info!(
            relation = %input.relation,
            detected = %classification.normal_form,
            goal = %self.config.target,
            fragments = fragments.len(),
            diagnostics = decomposition.diagnostics.len(),
            "normalization complete"
        );

        NormalizationReport {
            source: None,
            input,
            detected_normal_form: classification.normal_form,
            violation: classification.violation,
            current_normal_form: current,
            target_normal_form: self.config.target,
            fragments,
            diagnostics: decomposition.diagnostics,
        }
    }

    /// Load a sample file and run it.
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        keys: &[String],
        dependencies: &[String],
    ) -> Result<NormalizationReport> {
        let (relation, source) = self.load(path, keys, dependencies)?;
        let mut report = self.run(relation);
        report.source = Some(source);
        Ok(report)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    const SAMPLE: &str = "Course,Professor,ProfessorEmail,CourseStart\n\
        Math101,Dr.Smith,smith@mst.edu,1/1/2023\n\
        CS101,Dr.Jones,jones@mst.edu,2/1/2023\n";

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_load_str_attaches_dependencies() {
        let normalizer = Normalizer::new();
        let relation = normalizer
            .load_str(
                SAMPLE,
                &strings(&["Course"]),
                &strings(&["Course -> Professor, CourseStart", "Professor -> ProfessorEmail"]),
            )
            .unwrap();
        assert_eq!(relation.dependencies.len(), 2);
        assert_eq!(normalizer.analyze(&relation).normal_form, NormalForm::Second);
    }

    #[test]
    fn test_unknown_key_aborts() {
        let normalizer = Normalizer::new();
        let err = normalizer
            .load_str(SAMPLE, &strings(&["Room"]), &[])
            .unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownKeyAttribute(_)));
    }

    #[test]
    fn test_malformed_dependency_aborts() {
        let normalizer = Normalizer::new();
        let err = normalizer
            .load_str(SAMPLE, &strings(&["Course"]), &strings(&["Course Professor"]))
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_run_reports_fragments_with_ddl() {
        let normalizer = Normalizer::new();
        let relation = normalizer
            .load_str(
                SAMPLE,
                &strings(&["Course"]),
                &strings(&["Course -> Professor, CourseStart", "Professor -> ProfessorEmail"]),
            )
            .unwrap();

        let report = normalizer.run(relation);
        assert_eq!(report.detected_normal_form, NormalForm::Second);
        assert_eq!(report.current_normal_form, NormalForm::Second);
        assert_eq!(report.fragments.len(), 2);
        assert!(report.fragments.iter().all(|f| f.normal_form >= NormalForm::Third));
        let script = report.ddl_script();
        assert!(script.contains("CREATE TABLE Professors"));
        assert_eq!(script.matches("CREATE TABLE").count(), 2);
        assert!(script.contains(");\n\nCREATE TABLE"));
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_declared_current_level_is_trusted() {
        let normalizer = Normalizer::with_config(NormalizerConfig {
            current: NormalFormRequest::Level(NormalForm::Fifth),
            ..NormalizerConfig::default()
        });
        let relation = normalizer
            .load_str(
                SAMPLE,
                &strings(&["Course"]),
                &strings(&["Course -> Professor, CourseStart", "Professor -> ProfessorEmail"]),
            )
            .unwrap();

        let report = normalizer.run(relation);
        assert_eq!(report.fragments.len(), 1);
        assert_eq!(report.detected_normal_form, NormalForm::Second);
    }
}
