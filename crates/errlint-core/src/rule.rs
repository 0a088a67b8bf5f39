//! Rule trait for defining lint rules over parsed trees.

use crate::context::FileContext;
use crate::tree::Tree;
use crate::types::{Diagnostic, Severity};

/// A per-file lint rule over an immutable syntax tree.
///
/// Rules receive the parsed tree plus the file context and return the
/// diagnostics they found, in traversal order. A rule never mutates the
/// tree; a shape it does not recognize is simply not a match.
///
/// # Example
///
/// ```ignore
/// use errlint_core::{Diagnostic, FileContext, Rule, Tree};
///
/// pub struct NoBareRaise;
///
/// impl Rule for NoBareRaise {
///     fn name(&self) -> &'static str { "no-bare-raise" }
///     fn code(&self) -> &'static str { "EL900" }
///
///     fn check(&self, ctx: &FileContext<'_>, tree: &Tree) -> Vec<Diagnostic> {
///         // walk the tree, emit diagnostics
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g. "EL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for this rule's diagnostics.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Checks a single file's tree and returns any diagnostics found.
    fn check(&self, ctx: &FileContext<'_>, tree: &Tree) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
