//! CLI support for cmisql
//!
//! Provides programmatic access to the CLI operations for embedding in
//! other tools.

mod check;
mod filter;

pub use check::{execute_check, execute_render, load_predicate};
pub use filter::{execute_filter, FilterOptions};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Malformed JSON input
    Json(serde_json::Error),
    /// Malformed tree/schema/document structure
    Interchange(crate::InterchangeError),
    /// Structurally invalid predicate tree
    Shape(crate::ShapeError),
    /// Walk failure (decode error, unknown column, ...)
    Walk(crate::WalkError),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Interchange(e) => write!(f, "Invalid input: {}", e),
            CliError::Shape(e) => write!(f, "Malformed predicate: {}", e),
            CliError::Walk(e) => write!(f, "Evaluation error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Pass the tree as an argument or pipe JSON to stdin.")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Json(e) => Some(e),
            CliError::Interchange(e) => Some(e),
            CliError::Shape(e) => Some(e),
            CliError::Walk(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::NoInput => None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<crate::InterchangeError> for CliError {
    fn from(e: crate::InterchangeError) -> Self {
        CliError::Interchange(e)
    }
}

impl From<crate::ShapeError> for CliError {
    fn from(e: crate::ShapeError) -> Self {
        CliError::Shape(e)
    }
}

impl From<crate::WalkError> for CliError {
    fn from(e: crate::WalkError) -> Self {
        CliError::Walk(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
