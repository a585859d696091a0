//! The plan command: load, fetch, diff.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for the plan operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The loader and the diff engine use only `tracing::debug!()` for internal
//! details.

use crate::snapshot_source::SnapshotSource;
use driftplan_core::diff::{diff, DiffResult};
use driftplan_core::errors::{ExError, ExErrorKind, ParseError, Result};
use driftplan_core::{log_op_end, log_op_error, log_op_start};
use driftplan_loader::{load_repo, LoadOptions};

/// What to plan.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub load: LoadOptions,
    /// Restrict the plan to one group (case-insensitive); skips the global scope.
    pub group_filter: Option<String>,
}

impl PlanRequest {
    pub fn new(load: LoadOptions) -> Self {
        Self {
            load,
            group_filter: None,
        }
    }

    pub fn with_group_filter(mut self, group: impl Into<String>) -> Self {
        self.group_filter = Some(group.into());
        self
    }

    fn filter(&self) -> Option<&str> {
        self.group_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// Diff results plus every non-fatal problem found while loading.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub results: Vec<DiffResult>,
    pub parse_errors: Vec<ParseError>,
}

impl PlanOutcome {
    pub fn has_changes(&self) -> bool {
        self.results.iter().any(DiffResult::has_changes)
    }
}

/// Load the repository, fetch the snapshot and diff the two.
///
/// ## Errors
///
/// - `InvalidInput`: the repository path is not a directory
/// - `RepoStructure`: the repository layout is missing
/// - `NoGroups`: nothing to plan and nothing was reported while loading
/// - `Io` / `InvalidSnapshot`: the snapshot source failed
pub fn plan(request: &PlanRequest, source: &dyn SnapshotSource) -> Result<PlanOutcome> {
    log_op_start!(
        "plan",
        repo = %request.load.root.display(),
        group = request.filter().unwrap_or_default()
    );
    let start = std::time::Instant::now();

    let outcome = plan_impl(request, source).map_err(|e| {
        log_op_error!(
            "plan",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plan",
        duration_ms = start.elapsed().as_millis() as u64,
        results = outcome.results.len(),
        parse_errors = outcome.parse_errors.len()
    );

    Ok(outcome)
}

fn plan_impl(request: &PlanRequest, source: &dyn SnapshotSource) -> Result<PlanOutcome> {
    let root = &request.load.root;
    if !root.is_dir() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("plan")
            .with_path(root)
            .with_message("repository path is not a directory"));
    }

    let repo = load_repo(&request.load)?;
    for err in &repo.errors {
        tracing::warn!(err_code = err.kind.code(), "{}", err);
    }

    let filter = request.filter();
    let matching = repo
        .groups
        .iter()
        .filter(|g| filter.map_or(true, |f| g.name.eq_ignore_ascii_case(f)))
        .count();
    if matching == 0 && repo.errors.is_empty() {
        let message = match filter {
            Some(f) => format!("no group named {:?} found in repository", f),
            None => "no group declarations found in repository".to_string(),
        };
        return Err(ExError::new(ExErrorKind::NoGroups)
            .with_op("plan")
            .with_path(root)
            .with_message(message));
    }

    let snapshot = source.fetch()?;
    let results = diff(&snapshot, &repo, filter);

    Ok(PlanOutcome {
        results,
        parse_errors: repo.errors,
    })
}
