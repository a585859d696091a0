//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate the loader, the
//! snapshot source and the diff engine.

pub mod plan;
