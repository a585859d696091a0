//! Error helpers for driftplan-loader
//!
//! Builds core `ExError` / `ParseError` values with loader-specific context.

use driftplan_core::errors::{ExError, ExErrorKind, ParseError};
use std::path::Path;

/// Create a terminal repository layout error
pub fn repo_structure(path: &Path, reason: &str) -> ExError {
    ExError::new(ExErrorKind::RepoStructure)
        .with_op("load_repo")
        .with_path(path)
        .with_message(reason.to_string())
}

/// Record a file that could not be read
pub fn file_unreadable(file: &Path, err: &std::io::Error) -> ParseError {
    ParseError::new(
        ExErrorKind::FileUnreadable,
        file,
        format!("could not read: {}", err),
    )
}

/// Record a YAML syntax or shape error, keeping the line when serde_yaml has one
pub fn invalid_yaml(file: &Path, err: &serde_yaml::Error) -> ParseError {
    ParseError::new(
        ExErrorKind::InvalidYaml,
        file,
        format!("YAML parse error: {}", err),
    )
    .at_line(err.location().map(|loc| loc.line()))
}

/// Record a document whose top-level shape is wrong
pub fn unexpected_shape(file: &Path, expected: &str) -> ParseError {
    ParseError::new(
        ExErrorKind::InvalidYaml,
        file,
        format!("expected {} at top level", expected),
    )
}

/// Record a schema validation problem
pub fn validation(kind: ExErrorKind, file: &Path, message: impl Into<String>) -> ParseError {
    ParseError::new(kind, file, message)
}
