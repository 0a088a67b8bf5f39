//! Transactional text edits over one immutable source buffer.
//!
//! A [`Corrector`] accumulates [`Edit`]s expressed in the ORIGINAL buffer's
//! byte offsets, rejects overlapping registrations, and splices everything
//! in one batch. Offsets are never renumbered mid-pass; this is sound
//! because overlap is disallowed and the buffer is only rewritten once, at
//! [`Corrector::apply`] time.

use crate::tree::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single text substitution: replace `span` with `replacement`.
///
/// An insertion is a zero-length span with non-empty text; a removal is a
/// non-empty span with empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    span: Span,
    replacement: String,
}

impl Edit {
    /// Builds an edit replacing `span` with `replacement`.
    #[must_use]
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Builds an edit deleting `span`.
    #[must_use]
    pub fn remove(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
        }
    }

    /// Builds an insertion immediately before `span`.
    #[must_use]
    pub fn insert_before(span: Span, text: impl Into<String>) -> Self {
        Self {
            span: Span::point(span.start),
            replacement: text.into(),
        }
    }

    /// Builds an insertion immediately after `span`.
    #[must_use]
    pub fn insert_after(span: Span, text: impl Into<String>) -> Self {
        Self {
            span: Span::point(span.end),
            replacement: text.into(),
        }
    }

    /// Replaced byte range.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Replacement text.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Errors raised by edit registration.
///
/// Both variants indicate a programming error in a rule's fix
/// construction; silently dropping or misapplying the edit would corrupt
/// the rewritten source, so registration fails instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectorError {
    /// The new edit's range intersects one already registered.
    #[error("edit at {attempted} overlaps an already registered edit at {existing}")]
    Overlap {
        /// Range of the previously registered edit.
        existing: Span,
        /// Range of the rejected edit.
        attempted: Span,
    },

    /// The edit's range does not lie within the buffer.
    #[error("edit at {span} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds {
        /// Range of the rejected edit.
        span: Span,
        /// Buffer length in bytes.
        len: usize,
    },
}

/// Accumulator and applier of non-overlapping edits against one buffer.
#[derive(Debug)]
pub struct Corrector<'src> {
    source: &'src str,
    edits: Vec<Edit>,
}

impl<'src> Corrector<'src> {
    /// Creates a corrector over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Registers a replacement of `span` with `text`.
    ///
    /// # Errors
    ///
    /// Fails when the span is out of bounds or overlaps a registered edit.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) -> Result<(), CorrectorError> {
        self.register(Edit::replace(span, text))
    }

    /// Registers a deletion of `span`.
    ///
    /// # Errors
    ///
    /// Fails when the span is out of bounds or overlaps a registered edit.
    pub fn remove(&mut self, span: Span) -> Result<(), CorrectorError> {
        self.register(Edit::remove(span))
    }

    /// Registers an insertion immediately before `span`.
    ///
    /// # Errors
    ///
    /// Fails when the span is out of bounds or overlaps a registered edit.
    pub fn insert_before(
        &mut self,
        span: Span,
        text: impl Into<String>,
    ) -> Result<(), CorrectorError> {
        self.register(Edit::insert_before(span, text))
    }

    /// Registers an insertion immediately after `span`.
    ///
    /// # Errors
    ///
    /// Fails when the span is out of bounds or overlaps a registered edit.
    pub fn insert_after(
        &mut self,
        span: Span,
        text: impl Into<String>,
    ) -> Result<(), CorrectorError> {
        self.register(Edit::insert_after(span, text))
    }

    /// Registers a pre-built edit.
    ///
    /// # Errors
    ///
    /// Fails when the edit's span is out of bounds or overlaps a
    /// registered edit.
    pub fn register(&mut self, edit: Edit) -> Result<(), CorrectorError> {
        if edit.span.end > self.source.len() {
            return Err(CorrectorError::OutOfBounds {
                span: edit.span,
                len: self.source.len(),
            });
        }
        if let Some(existing) = self.edits.iter().find(|e| conflicts(e.span, edit.span)) {
            return Err(CorrectorError::Overlap {
                existing: existing.span,
                attempted: edit.span,
            });
        }
        self.edits.push(edit);
        Ok(())
    }

    /// Number of registered edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Splices every registered edit into the buffer and returns the
    /// rewritten text.
    ///
    /// Edits are sorted by start offset (stable, so same-point insertions
    /// keep registration order); the output is the unmodified prefix up to
    /// each edit's start, the replacement text, and the unmodified suffix
    /// after the last edit.
    #[must_use]
    pub fn apply(mut self) -> String {
        // Ordering by (start, end) keeps a same-offset insertion ahead of
        // the replacement it abuts, so splicing never walks backwards.
        self.edits.sort_by_key(|e| (e.span.start, e.span.end));

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            output.push_str(&self.source[cursor..edit.span.start]);
            output.push_str(&edit.replacement);
            cursor = edit.span.end;
        }
        output.push_str(&self.source[cursor..]);
        output
    }
}

/// Overlap extended to insertions: a zero-length span strictly inside a
/// replaced range clobbers it even though the byte ranges are disjoint.
fn conflicts(a: Span, b: Span) -> bool {
    a.overlaps(b)
        || (a.is_empty() && b.start < a.start && a.start < b.end)
        || (b.is_empty() && a.start < b.start && b.start < a.end)
}
