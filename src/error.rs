//! Typed errors raised by the library.
//!
//! `DocumentError` is structural and aborts the whole run. `NormalizeError`
//! and `IconError` only ever cost a single entry (or its icon) and are turned
//! into warnings by the processor.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("line {line}: block `{title}` is missing its END line")]
    UnterminatedBlock { title: String, line: usize },

    #[error(
        "line {line}: BEGIN inside block `{open_title}` (opened on line {open_line}); blocks do not nest"
    )]
    NestedBlock {
        line: usize,
        open_line: usize,
        open_title: String,
    },

    #[error("line {line}: BEGIN without a title")]
    MissingTitle { line: usize },
}

impl DocumentError {
    /// Source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            DocumentError::UnterminatedBlock { line, .. }
            | DocumentError::NestedBlock { line, .. }
            | DocumentError::MissingTitle { line } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("no minifier for language `{0}`")]
    UnknownLanguage(String),

    #[error("unterminated {what} starting on body line {line}")]
    Unterminated { what: &'static str, line: usize },

    #[error("translator `{command}` failed: {message}")]
    Translator { command: String, message: String },
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported icon type `{0}`")]
    UnsupportedType(String),
}
