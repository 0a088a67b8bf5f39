//! # errlint-rules
//!
//! Built-in lint rules for errlint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | EL001 | `deprecated-errors-hash` | Flags hash-style manipulation of the errors collection |
//!
//! ## Usage
//!
//! ```ignore
//! use errlint_core::{FileContext, FilePass};
//! use errlint_rules::DeprecatedErrorsHash;
//!
//! let outcome = FilePass::new()
//!     .rule(DeprecatedErrorsHash::new())
//!     .autocorrect(true)
//!     .run(&ctx, &tree)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod deprecated_errors_hash;

#[cfg(test)]
mod fixture;

pub use deprecated_errors_hash::DeprecatedErrorsHash;

/// Re-export core types for convenience.
pub use errlint_core::{Diagnostic, Rule, Severity};
