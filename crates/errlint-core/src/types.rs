//! Core types for reported findings and their fixes.

use crate::corrector::Edit;
use crate::tree::Span;
use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File the finding belongs to.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte span in the original buffer.
    pub span: Span,
}

/// An automatic correction: one or more edits applied atomically.
///
/// All edits of one fix either apply together or the whole pass fails; a
/// fix is never applied piecemeal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    edits: Vec<Edit>,
}

impl Fix {
    /// Builds a fix from its edits.
    #[must_use]
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    /// Builds a single-edit fix.
    #[must_use]
    pub fn single(edit: Edit) -> Self {
        Self { edits: vec![edit] }
    }

    /// The edits making up this fix.
    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }
}

/// A reported finding anchored to a matched node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g. "EL001").
    pub code: String,
    /// Rule name (e.g. "deprecated-errors-hash").
    pub rule: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Anchor location.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Automatic correction, when one can be derived safely.
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Creates a diagnostic without a fix.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fix: None,
        }
    }

    /// Attaches a fix.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Whether this diagnostic carries an automatic correction.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(fix) = &self.fix {
            for edit in fix.edits() {
                let _ = writeln!(output, "  = fix: `{}`", edit.replacement());
            }
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a [`Diagnostic`] into a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for RenderedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.code, d.message),
            help: d.fix.as_ref().and_then(|fix| {
                fix.edits()
                    .first()
                    .map(|edit| format!("auto-correctable: `{}`", edit.replacement()))
            }),
            span: SourceSpan::from((d.location.span.start, d.location.span.len())),
            label_message: d.rule.clone(),
        }
    }
}
