//! driftplan loader - reads a declaration repository into the canonical model
//!
//! Walks `<root>/teams/*.yml`, resolves every `path:` reference, keeps each
//! resolved path inside the repository root and derives content-based
//! identities. Problems scoped to one file or reference are recorded on the
//! returned [`ParsedRepo`](driftplan_core::ParsedRepo); only a missing or
//! unreadable repository layout is fatal.

pub mod errors;
pub mod repo;

pub use repo::paths::{RepoRoot, ResolveError};
pub use repo::{load_repo, LoadOptions};
