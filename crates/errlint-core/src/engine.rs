//! Ordered application of independent top-level patterns.

use crate::pattern::{Captures, MatchContext, Pattern};
use crate::tree::{NodeId, Tree};

/// A successful engine match: which pattern fired and what it captured.
#[derive(Debug, Clone)]
pub struct Match {
    /// Name of the pattern that matched.
    pub pattern: &'static str,
    /// Sub-nodes bound during the match.
    pub captures: Captures,
}

/// Tries a fixed ordered list of independent patterns against a node and
/// returns the first success.
///
/// Patterns share no mutable state, so a failed attempt cannot taint the
/// next one.
#[derive(Debug, Default)]
pub struct MatchEngine {
    patterns: Vec<(&'static str, Pattern)>,
}

impl MatchEngine {
    /// Creates an engine with no patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named pattern; earlier patterns take precedence.
    #[must_use]
    pub fn pattern(mut self, name: &'static str, pattern: Pattern) -> Self {
        self.patterns.push((name, pattern));
        self
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true when no pattern is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Applies the patterns in order and returns the first match, or `None`
    /// when every pattern fails.
    #[must_use]
    pub fn find_match(&self, tree: &Tree, node: NodeId, ctx: MatchContext) -> Option<Match> {
        self.patterns.iter().find_map(|(name, pattern)| {
            pattern.find(tree, node, ctx).map(|captures| Match {
                pattern: name,
                captures,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeKind, Span, TreeBuilder};

    fn errors_call_tree() -> Tree {
        let mut b = TreeBuilder::new();
        let recv = b.lvar("user", Span::new(0, 4));
        let call = b.call(Some(recv), "errors", vec![], Span::new(0, 11));
        b.finish(call)
    }

    #[test]
    fn first_matching_pattern_wins() {
        let tree = errors_call_tree();
        let engine = MatchEngine::new()
            .pattern(
                "by-name",
                Pattern::call_any_args(Pattern::any(), Pattern::name("errors")),
            )
            .pattern("by-kind", Pattern::kind(NodeKind::Call));

        let matched = engine
            .find_match(&tree, tree.root(), MatchContext::default())
            .expect("a pattern should match");
        assert_eq!(matched.pattern, "by-name");
    }

    #[test]
    fn later_pattern_matches_when_earlier_fails() {
        let tree = errors_call_tree();
        let engine = MatchEngine::new()
            .pattern(
                "wrong-name",
                Pattern::call_any_args(Pattern::any(), Pattern::name("messages")),
            )
            .pattern("by-kind", Pattern::kind(NodeKind::Call));

        let matched = engine
            .find_match(&tree, tree.root(), MatchContext::default())
            .expect("fallback pattern should match");
        assert_eq!(matched.pattern, "by-kind");
    }

    #[test]
    fn no_pattern_matching_returns_none() {
        let tree = errors_call_tree();
        let engine = MatchEngine::new().pattern("symbol", Pattern::kind(NodeKind::Symbol));

        assert!(engine
            .find_match(&tree, tree.root(), MatchContext::default())
            .is_none());
    }
}
