//! Repository root containment.
//!
//! Every `path:` reference is resolved through a [`RepoRoot`], which is
//! passed explicitly to each call. A reference may only resolve to the root
//! itself or to a descendant of it, judged on symlink-resolved real paths.

use driftplan_core::errors::{ExErrorKind, ParseError};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("path {reference:?} escapes repository root {root:?}")]
    Escape { reference: String, root: PathBuf },

    #[error("resolving {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Convert into a recorded error attributed to `file`.
    pub fn into_parse_error(self, file: &Path) -> ParseError {
        let kind = match &self {
            ResolveError::Escape { .. } => ExErrorKind::PathEscape,
            ResolveError::Io { .. } => ExErrorKind::FileUnreadable,
        };
        ParseError::new(kind, file, self.to_string())
    }
}

/// A canonicalized repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot {
    canonical: PathBuf,
}

impl RepoRoot {
    /// Canonicalize `root`.
    ///
    /// # Errors
    ///
    /// `ResolveError::Io` if the root does not exist or cannot be resolved.
    pub fn new(root: &Path) -> Result<Self, ResolveError> {
        let canonical = root.canonicalize().map_err(|source| ResolveError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { canonical })
    }

    pub fn path(&self) -> &Path {
        &self.canonical
    }

    /// Resolve `reference` against `base_dir` and check containment.
    ///
    /// Returns the real path of the target. A target that does not exist is
    /// checked through its deepest existing ancestor, so a dangling
    /// reference cannot slip past the check.
    ///
    /// # Errors
    ///
    /// - `Escape` if the real target lies outside the root
    /// - `Io` if an existing ancestor cannot be canonicalized
    pub fn resolve(&self, base_dir: &Path, reference: &str) -> Result<PathBuf, ResolveError> {
        let joined = base_dir.join(reference);
        let real = real_path(&joined)?;
        if real.starts_with(&self.canonical) {
            Ok(real)
        } else {
            Err(ResolveError::Escape {
                reference: reference.to_string(),
                root: self.canonical.clone(),
            })
        }
    }

    /// The declared location of `reference`: joined onto `base_dir` and
    /// folded lexically, without following symlinks.
    ///
    /// Identities derive from this path; only containment and reading use
    /// the real path from [`resolve`](Self::resolve).
    pub fn declared(&self, base_dir: &Path, reference: &str) -> PathBuf {
        fold_lexically(&base_dir.join(reference))
    }

    /// Path of `resolved` relative to the root, with `/` separators.
    pub fn relative(&self, resolved: &Path) -> Option<String> {
        let rel = resolved.strip_prefix(&self.canonical).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

/// Canonicalize a path that may not exist yet.
fn real_path(path: &Path) -> Result<PathBuf, ResolveError> {
    if let Ok(real) = path.canonicalize() {
        return Ok(real);
    }

    let folded = fold_lexically(path);
    let mut existing = folded.as_path();
    let mut rest = Vec::new();
    loop {
        if existing.exists() {
            break;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut real = if existing.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        existing.canonicalize()
    }
    .map_err(|source| ResolveError::Io {
        path: existing.to_path_buf(),
        source,
    })?;
    for name in rest.into_iter().rev() {
        real.push(name);
    }
    Ok(real)
}

/// Fold `.` and `name/..` components without touching the filesystem.
fn fold_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !matches!(out.components().next_back(), Some(Component::RootDir)) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_lexically() {
        assert_eq!(fold_lexically(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(fold_lexically(Path::new("/a/../../etc")), PathBuf::from("/etc"));
        assert_eq!(fold_lexically(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_escape_error_maps_to_path_escape_kind() {
        let err = ResolveError::Escape {
            reference: "../../etc/passwd".to_string(),
            root: PathBuf::from("/repo"),
        };
        let parse = err.into_parse_error(Path::new("/repo/teams/a.yml"));
        assert_eq!(parse.kind, ExErrorKind::PathEscape);
        assert!(parse.message.contains("escapes repository root"));
    }
}
