//! # errlint-core
//!
//! Core framework for tree-pattern linting and safe autocorrection.
//!
//! This crate provides the foundational types for building lint rules over
//! a parsed syntax tree. It includes:
//!
//! - [`Tree`]/[`TreeBuilder`] — immutable node arena the external parser
//!   targets
//! - [`Pattern`] and [`MatchEngine`] — declarative tree-shape matching
//!   with wildcards, alternation, and named captures
//! - [`Rule`] trait and [`FilePass`] for running rules over one file
//! - [`Diagnostic`] for representing findings
//! - [`Corrector`] for conflict-checked batch text edits
//!
//! ## Example
//!
//! ```ignore
//! use errlint_core::{FileContext, FilePass};
//!
//! let ctx = FileContext::new(path, &source);
//! let outcome = FilePass::new()
//!     .rule(MyRule::new())
//!     .autocorrect(true)
//!     .run(&ctx, &tree)?;
//! for diagnostic in &outcome.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod corrector;
mod engine;
mod pass;
mod pattern;
mod rule;
mod tree;
mod types;

pub use context::FileContext;
pub use corrector::{Corrector, CorrectorError, Edit};
pub use engine::{Match, MatchEngine};
pub use pass::{FilePass, PassError, PassOutcome};
pub use pattern::{Captures, MatchContext, Pattern};
pub use rule::{Rule, RuleBox};
pub use tree::{Node, NodeId, NodeKind, Span, Tree, TreeBuilder};
pub use types::{Diagnostic, Fix, Location, RenderedDiagnostic, Severity};
