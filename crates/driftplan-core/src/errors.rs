use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// handling and testing, and to one of the broad classes in [`ErrorClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Structural
    /// The repository root or its group declarations directory is missing
    RepoStructure,
    /// The repository contains no group declarations at all
    NoGroups,

    // File
    /// A declaration file could not be read
    FileUnreadable,
    /// A declaration file is not valid YAML or has the wrong shape
    InvalidYaml,

    // Validation
    /// A top-level key is not part of the declaration schema
    UnknownKey,
    /// A required field (e.g. a group `name`) is absent
    MissingField,
    /// An identity key appears twice in the same collection
    DuplicateIdentity,
    /// A field holds a value outside its allowed set
    InvalidValue,
    /// A `path:` reference is empty
    EmptyReference,

    // Path safety
    /// A reference resolves outside the repository root
    PathEscape,

    // Runtime
    InvalidInput,
    InvalidSnapshot,
    Io,
    Serialization,
}

/// Broad error classes used to decide whether a failure is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Terminal for the whole load
    Structural,
    /// Scoped to one file; siblings keep loading
    File,
    /// Recorded, non-fatal
    Validation,
    /// Scoped to one reference
    PathEscape,
    /// Failures outside the loader (snapshot sources, CLI plumbing)
    Runtime,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::RepoStructure => "ERR_REPO_STRUCTURE",
            ExErrorKind::NoGroups => "ERR_NO_GROUPS",
            ExErrorKind::FileUnreadable => "ERR_FILE_UNREADABLE",
            ExErrorKind::InvalidYaml => "ERR_INVALID_YAML",
            ExErrorKind::UnknownKey => "ERR_UNKNOWN_KEY",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::DuplicateIdentity => "ERR_DUPLICATE_IDENTITY",
            ExErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ExErrorKind::EmptyReference => "ERR_EMPTY_REFERENCE",
            ExErrorKind::PathEscape => "ERR_PATH_ESCAPE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Map this kind onto its error class
    pub fn class(&self) -> ErrorClass {
        match self {
            ExErrorKind::RepoStructure | ExErrorKind::NoGroups => ErrorClass::Structural,
            ExErrorKind::FileUnreadable | ExErrorKind::InvalidYaml => ErrorClass::File,
            ExErrorKind::UnknownKey
            | ExErrorKind::MissingField
            | ExErrorKind::DuplicateIdentity
            | ExErrorKind::InvalidValue
            | ExErrorKind::EmptyReference => ErrorClass::Validation,
            ExErrorKind::PathEscape => ErrorClass::PathEscape,
            ExErrorKind::InvalidInput
            | ExErrorKind::InvalidSnapshot
            | ExErrorKind::Io
            | ExErrorKind::Serialization => ErrorClass::Runtime,
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and optional
/// context (operation, file, line, group) for humans.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    line: Option<usize>,
    group: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            group: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add group name context
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            match self.line {
                Some(line) => write!(f, " ({}:{})", path.display(), line)?,
                None => write!(f, " ({})", path.display())?,
            }
        }
        if let Some(group) = &self.group {
            write!(f, " (group: {})", group)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// A non-fatal problem recorded while loading the repository.
///
/// Loading continues past every `ParseError`; the affected file, reference or
/// duplicate entry is simply left out of the model.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[error("{}", render_location(.file, .line, .message))]
pub struct ParseError {
    pub kind: ExErrorKind,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub message: String,
}

impl serde::Serialize for ExErrorKind {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

fn render_location(file: &Path, line: &Option<usize>, message: &str) -> String {
    match *line {
        Some(line) if line > 0 => format!("{}:{}: {}", file.display(), line, message),
        _ => format!("{}: {}", file.display(), message),
    }
}

impl ParseError {
    pub fn new(kind: ExErrorKind, file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl From<ParseError> for ExError {
    fn from(err: ParseError) -> Self {
        let mut ex = ExError::new(err.kind)
            .with_path(err.file)
            .with_message(err.message);
        if let Some(line) = err.line {
            ex = ex.with_line(line);
        }
        ex
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}
