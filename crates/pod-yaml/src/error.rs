//! Error types for YAML parsing.

use thiserror::Error;

/// Result type alias for pod-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("parse error: {message}")]
    ParseError {
        message: String,
        /// 1-based line of the offending token, when the scanner knows it
        line: Option<usize>,
    },

    /// The event stream did not describe a well-formed tree
    #[error("invalid YAML structure: {message}")]
    InvalidStructure { message: String },

    /// The input contained no document at all
    #[error("no YAML document found")]
    NoDocument,
}

impl Error {
    /// Source line of the error, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::ParseError { line, .. } => *line,
            Error::InvalidStructure { .. } | Error::NoDocument => None,
        }
    }
}
