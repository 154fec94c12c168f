//! # PyLearn Syntax
//!
//! Python highlighting and completion candidates for the exercise editor.
//!
//! ## Why Tree-sitter?
//!
//! - **Error-tolerant**: half-typed student code still yields a usable tree
//! - **Accurate**: a name inside a string or a comment is not offered as a
//!   completion and is not colored as a builtin
//! - **Fast**: exercise-sized sources reparse well within a keystroke
//!
//! Highlights are produced per line because the editor widget asks for
//! colors one line at a time.

mod completion;
mod highlight;
mod python;

pub use completion::{Completion, CompletionKind, CompletionProvider, CompletionSet};
pub use highlight::{HighlightKind, HighlightSpan, Highlighter, LineHighlights, LineSpan};
pub use python::{BUILTINS, KEYWORDS};

/// Errors that can occur during syntax processing.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Parser error")]
    ParseError,
}

/// Result type for syntax operations
pub type SyntaxResult<T> = Result<T, SyntaxError>;
