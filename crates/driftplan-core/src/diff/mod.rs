//! Drift diff engine.
//!
//! Matches the loaded repository against a remote snapshot and produces a
//! structured, deterministic diff per group.
//!
//! ## Entry point
//!
//! ```ignore
//! use driftplan_core::diff::{diff, render_markdown};
//!
//! let results = diff(&snapshot, &repo, None);
//! let summary = render_markdown(&results);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical, sorted output.
//! - **No failure path**: missing or inconsistent remote data degrades to
//!   additions or informational messages, never to an error.
//! - **Whitespace-insensitive text**: free-text fields are compared and
//!   reported in whitespace-normalized form.
//! - **Placeholder skipping**: config values containing `$` are never compared.

pub mod config;
pub mod engine;
pub mod human_summary;
pub mod inference;
pub(crate) mod labels;
pub mod model;
pub(crate) mod resources;
pub(crate) mod software;

pub use engine::{diff, GLOBAL_SCOPE, UNGROUPED_SENTINEL};
pub use human_summary::{render_json, render_markdown};
pub use model::{
    ChangeKind, ConfigChange, DiffMessage, DiffResult, FieldDiff, LabelRef, LabelValidation,
    ResourceChange, ResourceDiff, Severity,
};
