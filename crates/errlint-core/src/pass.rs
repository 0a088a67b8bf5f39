//! Per-file pass: runs rules over one tree and applies their fixes.

use crate::context::FileContext;
use crate::corrector::{Corrector, CorrectorError};
use crate::rule::{Rule, RuleBox};
use crate::tree::Tree;
use crate::types::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while finishing a pass.
#[derive(Debug, Error)]
pub enum PassError {
    /// Two fixes produced edits over intersecting ranges. This is a
    /// programming error in a rule's fix construction and is surfaced
    /// rather than silently corrupting the rewritten source.
    #[error("conflicting fixes: {0}")]
    FixConflict(#[from] CorrectorError),
}

/// Result of one file pass.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PassOutcome {
    /// All diagnostics, ordered by span start (traversal order preserved
    /// among equal starts).
    pub diagnostics: Vec<Diagnostic>,
    /// The rewritten buffer, when autocorrect ran and at least one fix was
    /// registered.
    pub corrected: Option<String>,
}

impl PassOutcome {
    /// Returns true if there are any error-severity diagnostics.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Number of diagnostics carrying a fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fixable()).count()
    }
}

/// Runs an ordered set of rules over one file's tree.
///
/// Each pass owns nothing shared: independent files (or independent rule
/// sets) can run on independent workers without coordination.
#[derive(Default)]
pub struct FilePass {
    rules: Vec<RuleBox>,
    autocorrect: bool,
}

impl FilePass {
    /// Creates a pass with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the pass.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the pass.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Enables or disables fix application (default: disabled).
    #[must_use]
    pub fn autocorrect(mut self, enabled: bool) -> Self {
        self.autocorrect = enabled;
        self
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every rule and, when autocorrecting, applies all fixes in one
    /// batch over the original buffer.
    ///
    /// One rule finding nothing never affects another; diagnostics from
    /// all rules are merged and stably ordered by span start.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::FixConflict`] when two fixes try to edit
    /// intersecting ranges.
    pub fn run(&self, ctx: &FileContext<'_>, tree: &Tree) -> Result<PassOutcome, PassError> {
        debug!("Checking {}", ctx.path.display());

        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            debug!("Running rule {}", rule.name());
            diagnostics.extend(rule.check(ctx, tree));
        }
        diagnostics.sort_by_key(|d| d.location.span.start);

        let corrected = if self.autocorrect {
            self.apply_fixes(ctx, &diagnostics)?
        } else {
            None
        };

        info!(
            "Pass complete: {} diagnostic(s) in {}",
            diagnostics.len(),
            ctx.path.display()
        );

        Ok(PassOutcome {
            diagnostics,
            corrected,
        })
    }

    /// Registers every fix edit into one corrector and applies the batch.
    fn apply_fixes(
        &self,
        ctx: &FileContext<'_>,
        diagnostics: &[Diagnostic],
    ) -> Result<Option<String>, PassError> {
        let mut corrector = Corrector::new(ctx.source);
        for diagnostic in diagnostics {
            if let Some(fix) = &diagnostic.fix {
                for edit in fix.edits() {
                    corrector.register(edit.clone())?;
                }
            }
        }
        if corrector.is_empty() {
            return Ok(None);
        }
        Ok(Some(corrector.apply()))
    }
}
