//! driftplan core - canonical repository model and drift diff engine
//!
//! This crate provides:
//! - The normalized repository model produced by the loader
//! - The typed remote snapshot contract consumed by the diff engine
//! - The deterministic, side-effect-free diff engine
//! - The error facility shared by every driftplan crate
//! - The structured logging facility
//! - Markdown and JSON renderers for diff results

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;

#[doc(hidden)]
pub use driftplan_core_types as core_types;

// Re-export commonly used types
pub use diff::{diff, DiffResult};
pub use errors::{ErrorClass, ExError, ExErrorKind, ParseError, Result};
pub use model::{ParsedRepo, RemoteSnapshot};
