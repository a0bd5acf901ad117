//! Advisory outcomes recorded while decomposing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normal_form::NormalForm;

/// How much attention a diagnostic deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

/// What happened to a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The level failed but no determinant to split on was found.
    DecompositionStalled,
    /// A split would have left a side with fewer than two attributes.
    Unsplittable,
    /// A cell does not fit its column type; no schema change can fix that.
    TypeMismatch,
    /// A 1NF problem was repaired in place.
    Repaired,
}

/// A non-fatal note attached to a decomposition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Name of the fragment concerned.
    pub relation: String,
    /// Level being processed when this was recorded.
    pub level: NormalForm,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(
        kind: DiagnosticKind,
        relation: &str,
        level: NormalForm,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            relation: relation.to_string(),
            level,
            message: message.into(),
        }
    }

    pub fn info(
        kind: DiagnosticKind,
        relation: &str,
        level: NormalForm,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::warning(kind, relation, level, message)
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity.label(),
            self.relation,
            self.level,
            self.message
        )
    }
}
