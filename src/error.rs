//! Error types for the evaluation run.
//!
//! Every failure surfaces as an [`EvalError`]. All of them are fatal for a
//! run: the driver stops at the first one and reports it on a single line.
//! A search that returns no documents is not an error.
//!
//! # Examples
//!
//! ```
//! use jeopardy_eval::error::{EvalError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(EvalError::malformed_input("line 5: missing answers line"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for evaluation operations.
#[derive(Error, Debug)]
pub enum EvalError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The question file does not contain a complete 4-line group
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The index cannot be opened or read
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    /// A query failed to parse
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// A metric was requested before any question was evaluated
    #[error("No data: {0}")]
    NoData(String),

    /// Analysis-related errors (tokenizer construction)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with EvalError.
pub type Result<T> = std::result::Result<T, EvalError>;

impl EvalError {
    /// Create a new malformed input error.
    pub fn malformed_input<S: Into<String>>(msg: S) -> Self {
        EvalError::MalformedInput(msg.into())
    }

    /// Create a new index unavailable error.
    pub fn index_unavailable<S: Into<String>>(msg: S) -> Self {
        EvalError::IndexUnavailable(msg.into())
    }

    /// Create a new query syntax error.
    pub fn query_syntax<S: Into<String>>(msg: S) -> Self {
        EvalError::QuerySyntax(msg.into())
    }

    /// Create a new no-data error.
    pub fn no_data<S: Into<String>>(msg: S) -> Self {
        EvalError::NoData(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        EvalError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        EvalError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = EvalError::malformed_input("line 9: missing clue line");
        assert_eq!(error.to_string(), "Malformed input: line 9: missing clue line");

        let error = EvalError::index_unavailable("meta.json not found");
        assert_eq!(error.to_string(), "Index unavailable: meta.json not found");

        let error = EvalError::query_syntax("unterminated phrase");
        assert_eq!(error.to_string(), "Query syntax error: unterminated phrase");

        let error = EvalError::no_data("precision");
        assert_eq!(error.to_string(), "No data: precision");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let eval_error = EvalError::from(io_error);

        match eval_error {
            EvalError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
