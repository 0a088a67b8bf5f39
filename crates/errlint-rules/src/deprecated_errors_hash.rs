//! Rule to flag hash-style manipulation of the errors collection.
//!
//! # Rationale
//!
//! Indexing into the errors collection and mutating the result
//! (`record.errors[:name] << 'bad'`, `record.errors.messages[:name].clear`)
//! is deprecated: the collection is no longer backed by a plain hash, so
//! the mutation is silently lost. The supported API goes through `add` and
//! `delete`.
//!
//! # Detected Patterns
//!
//! - `record.errors[:attr].<manipulator>(...)`
//! - `record.errors[:attr] = values`
//! - `record.errors.messages[:attr].<manipulator>(...)` (also `details`)
//! - `record.errors.messages[:attr] = values` (also `details`)
//!
//! Inside a model file a bare `errors[:attr]` receiver is recognized too.
//!
//! # Good Patterns
//!
//! ```ignore
//! record.errors.add(:name, 'bad')
//! record.errors.delete(:name)
//! ```
//!
//! Only `<<` and `clear` are rewritten automatically: their replacements
//! are derivable from the matched operands alone. Every other manipulator,
//! and the assignment form, is reported for manual migration.

use errlint_core::{
    Diagnostic, Edit, FileContext, Fix, Match, MatchContext, MatchEngine, NodeId, NodeKind,
    Pattern, Rule, Severity, Span, Tree,
};

/// Rule code for deprecated-errors-hash.
pub const CODE: &str = "EL001";

/// Rule name for deprecated-errors-hash.
pub const NAME: &str = "deprecated-errors-hash";

const MESSAGE: &str = "Avoid manipulating the errors collection as a hash directly.";

/// Methods that mutate the indexed message array in place.
const MANIPULATIVE_METHODS: &[&str] = &[
    "<<",
    "append",
    "clear",
    "collect!",
    "compact!",
    "concat",
    "delete",
    "delete_at",
    "delete_if",
    "drop",
    "drop_while",
    "fill",
    "filter!",
    "flatten!",
    "insert",
    "keep_if",
    "map!",
    "pop",
    "prepend",
    "push",
    "reject!",
    "replace",
    "select!",
    "shift",
    "slice!",
    "sort!",
    "sort_by!",
    "uniq!",
    "unshift",
];

/// The safely rewritable subset. Kept deliberately narrow: a correct
/// rewrite for anything else is not derivable from local information.
const AUTOCORRECTABLE_METHODS: &[&str] = &["<<", "clear"];

/// Hash views reachable from the errors collection.
const INDEX_QUALIFIERS: &[&str] = &["messages", "details"];

/// Flags hash-style access to the errors collection.
#[derive(Debug)]
pub struct DeprecatedErrorsHash {
    severity: Severity,
    engine: MatchEngine,
}

impl Default for DeprecatedErrorsHash {
    fn default() -> Self {
        Self::new()
    }
}

impl DeprecatedErrorsHash {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            engine: build_engine(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn visit(
        &self,
        ctx: &FileContext<'_>,
        tree: &Tree,
        id: NodeId,
        match_ctx: MatchContext,
        out: &mut Vec<Diagnostic>,
    ) {
        let node = tree.node(id);
        if node.kind() == NodeKind::Call {
            if let Some(matched) = self.engine.find_match(tree, id, match_ctx) {
                out.push(self.diagnostic(ctx, tree, id, &matched));
                // The whole chain is reported through its outermost call;
                // descending again would anchor duplicates inside it.
                return;
            }
        }
        for child in node.child_ids() {
            self.visit(ctx, tree, child, match_ctx, out);
        }
    }

    fn diagnostic(
        &self,
        ctx: &FileContext<'_>,
        tree: &Tree,
        anchor: NodeId,
        matched: &Match,
    ) -> Diagnostic {
        let node = tree.node(anchor);
        let diagnostic = Diagnostic::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(node.span()),
            MESSAGE,
        );
        match build_fix(ctx, tree, anchor, matched) {
            Some(fix) => diagnostic.with_fix(fix),
            None => diagnostic,
        }
    }
}

impl Rule for DeprecatedErrorsHash {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags hash-style manipulation of the errors collection"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext<'_>, tree: &Tree) -> Vec<Diagnostic> {
        let match_ctx = MatchContext {
            in_model: ctx.in_model,
        };
        let mut diagnostics = Vec::new();
        self.visit(ctx, tree, tree.root(), match_ctx, &mut diagnostics);
        diagnostics
    }
}

/// What may receive `.errors`: any simple receiver expression, and inside
/// a model also no receiver at all (implicit self).
fn receiver_pattern() -> Pattern {
    let simple = Pattern::kinds(&[
        NodeKind::Call,
        NodeKind::InstanceVarRead,
        NodeKind::LocalVarRead,
    ]);
    Pattern::select(
        Pattern::any_of(vec![Pattern::absent(), simple.clone()]),
        simple,
    )
}

/// `<receiver>.errors`, captured for fix-range computation.
fn errors_call() -> Pattern {
    Pattern::call(receiver_pattern(), Pattern::name("errors"), vec![]).capture("errors")
}

/// `<receiver>.errors.messages` / `.details`.
fn qualified_call() -> Pattern {
    Pattern::call(
        errors_call(),
        Pattern::names(INDEX_QUALIFIERS.iter().copied()),
        vec![],
    )
}

/// `<collection>[<key>]` with the key captured.
fn index_call(collection: Pattern) -> Pattern {
    Pattern::call(
        collection,
        Pattern::name("[]"),
        vec![Pattern::any().capture("key")],
    )
}

/// `<collection>[<key>] = <value>` parses as an `[]=` call on the
/// collection itself.
fn index_assign(collection: Pattern) -> Pattern {
    Pattern::call(
        collection,
        Pattern::name("[]="),
        vec![Pattern::any().capture("key"), Pattern::any()],
    )
}

fn build_engine() -> MatchEngine {
    let manipulator = || Pattern::names(MANIPULATIVE_METHODS.iter().copied());
    MatchEngine::new()
        .pattern(
            "index-manipulate",
            Pattern::call_any_args(index_call(errors_call()), manipulator()),
        )
        .pattern("index-assign", index_assign(errors_call()))
        .pattern(
            "qualified-index-manipulate",
            Pattern::call_any_args(index_call(qualified_call()), manipulator()),
        )
        .pattern("qualified-index-assign", index_assign(qualified_call()))
}

/// Builds the replacement for the safely rewritable methods.
///
/// The replaced range runs from just past the `errors` receiver to the end
/// of the outer call, discarding the whole `[key]` / `.messages[key]` /
/// manipulator chain in one edit.
fn build_fix(
    ctx: &FileContext<'_>,
    tree: &Tree,
    anchor: NodeId,
    matched: &Match,
) -> Option<Fix> {
    let node = tree.node(anchor);
    let method = node.name()?;
    if !AUTOCORRECTABLE_METHODS.contains(&method) {
        return None;
    }

    let errors = matched.captures.get("errors")?;
    let key = matched.captures.get("key")?;
    let key_source = ctx.slice(tree.node(key).span());

    let replacement = match method {
        "<<" => {
            let value = *node.args().first()?;
            let value_source = ctx.slice(tree.node(value).span());
            format!(".add({key_source}, {value_source})")
        }
        "clear" if node.args().is_empty() => format!(".delete({key_source})"),
        _ => return None,
    };

    let tail = Span::new(tree.node(errors).span().end, node.span().end);
    Some(Fix::single(Edit::replace(tail, replacement)))
}
