//! Diff computation over a whole repository.
//!
//! The core entry point is [`diff`], which matches the loaded repository
//! against a remote snapshot and returns one [`DiffResult`] per scope.

use crate::diff::config::{declares_config, diff_config};
use crate::diff::inference::infer_vendor_apps;
use crate::diff::labels::validate_labels;
use crate::diff::model::DiffResult;
use crate::diff::resources::{diff_policies, diff_profiles, diff_queries};
use crate::diff::software::diff_software;
use crate::model::{GlobalScope, Group, ParsedRepo, RemoteGroup, RemoteSnapshot};

/// Name of the result produced for the global declaration.
pub const GLOBAL_SCOPE: &str = "(global)";

/// Group that always exists on the platform but is never listed by it.
///
/// Matched case-insensitively. Such a group gets a resource-count note
/// instead of a diff.
pub const UNGROUPED_SENTINEL: &str = "No team";

/// Compute the drift between `proposed` and `remote`.
///
/// With a group filter only the matching group (case-insensitive) is
/// diffed and the global scope is skipped. Results are ordered: global
/// scope first, then groups in declaration order.
pub fn diff(
    remote: &RemoteSnapshot,
    proposed: &ParsedRepo,
    group_filter: Option<&str>,
) -> Vec<DiffResult> {
    let filter = group_filter.map(str::trim).filter(|f| !f.is_empty());
    let mut results = Vec::new();

    if let (Some(global), None) = (&proposed.global, filter) {
        results.push(diff_global(remote, global));
    }

    for group in &proposed.groups {
        if filter.is_some_and(|f| !group.name.eq_ignore_ascii_case(f)) {
            continue;
        }
        let result = match remote.group(&group.name) {
            Some(current) => diff_group(remote, current, group),
            None if group.name.eq_ignore_ascii_case(UNGROUPED_SENTINEL) => ungrouped_note(group),
            None => diff_new_group(remote, group),
        };
        tracing::debug!(
            group = %result.group,
            policies = result.policies.total(),
            queries = result.queries.total(),
            software = result.software.total(),
            profiles = result.profiles.total(),
            "Diffed group"
        );
        results.push(result);
    }

    results
}

fn diff_global(remote: &RemoteSnapshot, global: &GlobalScope) -> DiffResult {
    let mut result = DiffResult::new(GLOBAL_SCOPE);

    match &remote.config {
        Some(config) => result.config = diff_config(config, global),
        None if declares_config(global) => {
            result.info("remote configuration not available in snapshot; config sections were not compared")
        }
        None => {}
    }

    let remote_policies = remote.global_policies.as_deref().unwrap_or_default();
    result.policies = diff_policies(remote_policies, &global.policies);
    result.queries = diff_queries(
        remote.global_queries.as_deref().unwrap_or_default(),
        &global.queries,
    );
    result.labels = validate_labels(
        &global.policies,
        remote_policies,
        &remote.labels,
        &result.policies,
    );
    result
}

fn diff_group(remote: &RemoteSnapshot, current: &RemoteGroup, group: &Group) -> DiffResult {
    let mut result = DiffResult::new(&group.name);

    result.policies = diff_policies(&current.policies, &group.policies);
    result.queries = diff_queries(&current.queries, &group.queries);

    let mut software = current.software.clone();
    if software.vendor_apps.is_none() && !group.software.vendor_apps.is_empty() {
        software.vendor_apps = infer_vendor_apps(current, remote.vendor_catalog.as_deref());
    }
    result.software = diff_software(&software, &group.software);

    let (profiles, warnings) = diff_profiles(&current.profiles, &group.profiles);
    result.profiles = profiles;
    for warning in warnings {
        result.warn(warning);
    }

    result.labels = validate_labels(
        &group.policies,
        &current.policies,
        &remote.labels,
        &result.policies,
    );
    result
}

fn diff_new_group(remote: &RemoteSnapshot, group: &Group) -> DiffResult {
    let empty = RemoteGroup::default();
    let mut result = diff_group(remote, &empty, group);
    result.info(format!(
        "group {:?} does not exist remotely yet (will be created)",
        group.name
    ));
    result
}

fn ungrouped_note(group: &Group) -> DiffResult {
    let mut result = DiffResult::new(&group.name);
    let (policies, queries) = (group.policies.len(), group.queries.len());
    if policies > 0 || queries > 0 {
        result.info(format!(
            "{} policies, {} queries configured (no remote diff available for {:?})",
            policies, queries, UNGROUPED_SENTINEL
        ));
    }
    result
}
