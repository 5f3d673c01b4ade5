//! Error types for Duper decoding and encoding operations.

use std::fmt;

use thiserror::Error;

/// A location in Duper source text.
///
/// `offset` is a byte offset into the input; `line` and `column` are 1-based
/// and count characters, so they match what an editor displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur while decoding or encoding Duper documents.
///
/// Each variant is terminal for the call that produced it: the pipeline never
/// retries, partially recovers, or attempts an alternate binding. `Lex` and
/// `Parse` carry a [`Position`] so callers can report a precise source
/// location.
#[derive(Error, Debug)]
pub enum DuperError {
    /// A malformed token: bad escape, unterminated string, illegal character.
    #[error("lex error at {position}: {reason}")]
    Lex { position: Position, reason: String },

    /// A grammar violation: missing delimiter, misplaced token, trailing
    /// content after a complete document.
    #[error("parse error at {position}: expected {expected}, found {found}")]
    Parse {
        position: Position,
        expected: String,
        found: String,
    },

    /// A registered constructor rejected its payload during binding.
    #[error("bind error for tag `{tag}`: {cause}")]
    Bind { tag: String, cause: String },

    /// A host value cannot be represented as Duper text.
    #[error("encode error: {reason}")]
    Encode { reason: String },

    /// The byte source or sink of `load`/`dump` failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// `load` received bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in input: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Convenience alias used throughout duper-core.
pub type Result<T> = std::result::Result<T, DuperError>;
