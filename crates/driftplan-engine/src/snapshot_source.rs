//! Where the remote snapshot comes from.
//!
//! The fetch layer (pagination, auth, retries) lives outside this
//! workspace; it hands the engine a [`RemoteSnapshot`] through the
//! [`SnapshotSource`] seam.

use driftplan_core::errors::{ExError, ExErrorKind};
use driftplan_core::model::RemoteSnapshot;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("reading snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decoding snapshot {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SnapshotError> for ExError {
    fn from(err: SnapshotError) -> Self {
        let (kind, path) = match &err {
            SnapshotError::Io { path, .. } => (ExErrorKind::Io, path.clone()),
            SnapshotError::Decode { path, .. } => (ExErrorKind::InvalidSnapshot, path.clone()),
        };
        ExError::new(kind)
            .with_op("fetch_snapshot")
            .with_path(path)
            .with_message(err.to_string())
    }
}

/// Supplies the current remote state.
pub trait SnapshotSource {
    /// Produce the snapshot to diff against.
    ///
    /// # Errors
    ///
    /// Source-specific; the engine reports any failure as the plan error.
    fn fetch(&self) -> Result<RemoteSnapshot, SnapshotError>;
}

/// A snapshot serialized as JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonSnapshotFile {
    fn fetch(&self) -> Result<RemoteSnapshot, SnapshotError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot: RemoteSnapshot =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Decode {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            groups = snapshot.groups.len(),
            labels = snapshot.labels.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

/// An in-memory snapshot, handed out by clone.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot(pub RemoteSnapshot);

impl SnapshotSource for StaticSnapshot {
    fn fetch(&self) -> Result<RemoteSnapshot, SnapshotError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_io() {
        let source = JsonSnapshotFile::new("/nonexistent/driftplan/snapshot.json");
        let err: ExError = source.fetch().unwrap_err().into();
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.op(), Some("fetch_snapshot"));
    }

    #[test]
    fn test_static_snapshot_returns_copy() {
        let snapshot = RemoteSnapshot {
            config: Some(Default::default()),
            ..Default::default()
        };
        let source = StaticSnapshot(snapshot.clone());
        assert_eq!(source.fetch().unwrap(), snapshot);
    }
}
