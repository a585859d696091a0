//! Core types shared across driftplan facilities
//!
//! Holds the canonical schema constants used by structured logging and
//! error reporting so that every crate emits the same field names.

pub mod schema;
