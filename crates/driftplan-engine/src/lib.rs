//! driftplan engine - orchestration layer
//!
//! Coordinates the repository loader, a snapshot source and the diff
//! engine into a single plan operation, and owns its lifecycle logging.

pub mod commands;
pub mod snapshot_source;

pub use commands::plan::{plan, PlanOutcome, PlanRequest};
pub use snapshot_source::{JsonSnapshotFile, SnapshotError, SnapshotSource, StaticSnapshot};
