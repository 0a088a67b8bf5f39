//! Per-file context: source-buffer metadata and the model-context
//! predicate.

use crate::tree::Span;
use crate::types::Location;
use std::path::Path;

/// Context provided to rules for one file pass.
///
/// Carries the original source buffer (every span in the tree indexes into
/// it) and the context predicate outcome rules use to select pattern
/// alternatives.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file being analyzed.
    pub path: &'a Path,
    /// Original source text.
    pub source: &'a str,
    /// Whether this file is semantically a model file.
    pub in_model: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a context, deriving the model predicate from the path.
    ///
    /// A path is treated as a model file when any directory segment is
    /// `models`. Paths that cannot be inspected simply yield `false`;
    /// missing context information must not prevent analysis.
    #[must_use]
    pub fn new(path: &'a Path, source: &'a str) -> Self {
        Self {
            path,
            source,
            in_model: Self::detect_model_path(path),
        }
    }

    /// Overrides the model predicate; for callers that know the file's
    /// semantic role better than its path suggests.
    #[must_use]
    pub fn with_model_context(mut self, in_model: bool) -> Self {
        self.in_model = in_model;
        self
    }

    fn detect_model_path(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(segment) = component {
                segment.to_str() == Some("models")
            } else {
                false
            }
        })
    }

    /// Verbatim source text of a span; empty for out-of-range spans.
    #[must_use]
    pub fn slice(&self, span: Span) -> &'a str {
        self.source.get(span.start..span.end).unwrap_or_default()
    }

    /// 1-indexed line and column for a byte offset.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let upto = self.source.get(..offset).unwrap_or(self.source);
        let line = upto.bytes().filter(|&b| b == b'\n').count() + 1;
        let column = offset - upto.rfind('\n').map_or(0, |i| i + 1) + 1;
        (line, column)
    }

    /// Builds a [`Location`] anchored at `span`.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self.line_col(span.start);
        Location {
            file: self.path.to_path_buf(),
            line,
            column,
            span,
        }
    }
}
