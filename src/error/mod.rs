//! Unified error handling for procsql.
//!
//! This module defines [`ProcError`], the single error type propagated by
//! every stage of the pipeline: the lexer, the recursive-descent parser and
//! the interpreter/transpiler.
//!
//! A convenience [`Result<T>`] type alias is re-exported so that callers can
//! write `Result<T>` instead of `std::result::Result<T, ProcError>`.

use std::fmt;
use std::io;

/// The canonical error type for all procsql operations.
///
/// Every failure is fatal for the run: nothing in the pipeline retries or
/// recovers. Variants that originate in the source text carry the line on
/// which the problem was found.
#[derive(Debug)]
pub enum ProcError {
    /// An I/O error while reading a script or writing emitted code.
    Io(io::Error),

    /// The lexer met a character it cannot classify, a scan ran off the
    /// end of the input without finding its delimiter, or the next token
    /// was not of the category the caller asked for.
    Lex { line: usize, message: String },

    /// The token stream does not match the grammar. `expected` names what
    /// the parser was looking for and `found` describes the actual token.
    Parse {
        line: usize,
        expected: String,
        found: String,
    },

    /// A `PRINT` referenced a variable that was never assigned.
    UnknownVariable { line: usize, name: String },

    /// An internal invariant was violated. This indicates a bug in procsql
    /// itself rather than in the script being processed.
    Internal(String),
}

impl ProcError {
    /// The source line the error refers to, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ProcError::Lex { line, .. }
            | ProcError::Parse { line, .. }
            | ProcError::UnknownVariable { line, .. } => Some(*line),
            ProcError::Io(_) | ProcError::Internal(_) => None,
        }
    }

    pub(crate) fn lex(line: usize, message: impl Into<String>) -> Self {
        ProcError::Lex {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn parse(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ProcError::Parse {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcError::Io(err) => write!(f, "I/O error: {err}"),
            ProcError::Lex { line, message } => write!(f, "line {line}: lex error: {message}"),
            ProcError::Parse {
                line,
                expected,
                found,
            } => write!(f, "line {line}: parse error: expected {expected}, found {found}"),
            ProcError::UnknownVariable { line, name } => {
                write!(f, "line {line}: variable ${name} was never assigned")
            }
            ProcError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for ProcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProcError {
    fn from(err: io::Error) -> Self {
        ProcError::Io(err)
    }
}

/// A specialised [`Result`] type for procsql operations.
pub type Result<T> = std::result::Result<T, ProcError>;
