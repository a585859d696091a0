//! Label cross-reference validation.

use crate::diff::model::{LabelRef, LabelValidation, ResourceDiff};
use crate::model::{Policy, RemoteLabel, RemotePolicy};
use std::collections::BTreeSet;

/// Check the labels referenced by every changed policy.
///
/// Proposed policies are visited in declaration order, then deleted remote
/// policies. The first policy to reference a label is the one recorded.
pub(crate) fn validate_labels(
    proposed: &[Policy],
    remote: &[RemotePolicy],
    labels: &[RemoteLabel],
    changes: &ResourceDiff,
) -> LabelValidation {
    let changed: BTreeSet<&str> = changes.changed_names().collect();
    let deleted: BTreeSet<&str> = changes.deleted.iter().map(|c| c.name.as_str()).collect();

    let proposed_refs = proposed
        .iter()
        .filter(|p| changed.contains(p.name.as_str()))
        .flat_map(|p| p.label_refs().map(move |l| (l, p.name.as_str())));
    let remote_refs = remote
        .iter()
        .filter(|p| deleted.contains(p.name.as_str()))
        .flat_map(|p| {
            p.labels_include_any
                .iter()
                .chain(p.labels_exclude_any.iter())
                .map(move |l| (l.as_str(), p.name.as_str()))
        });

    let mut validation = LabelValidation::default();
    let mut seen = BTreeSet::new();
    for (label, policy) in proposed_refs.chain(remote_refs) {
        if !seen.insert(label) {
            continue;
        }
        match labels.iter().find(|l| l.name == label) {
            Some(found) => validation.valid.push(LabelRef {
                name: label.to_string(),
                host_count: Some(found.host_count),
                referenced_by: policy.to_string(),
            }),
            None => validation.missing.push(LabelRef {
                name: label.to_string(),
                host_count: None,
                referenced_by: policy.to_string(),
            }),
        }
    }

    validation.valid.sort_by(|a, b| a.name.cmp(&b.name));
    validation.missing.sort_by(|a, b| a.name.cmp(&b.name));
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::ResourceChange;

    fn policy(name: &str, include: &[&str]) -> Policy {
        Policy {
            name: name.to_string(),
            labels_include_any: include.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn label(name: &str, hosts: u64) -> RemoteLabel {
        RemoteLabel {
            id: 1,
            name: name.to_string(),
            host_count: hosts,
        }
    }

    #[test]
    fn test_only_changed_policies_are_checked() {
        let proposed = vec![policy("changed", &["macOS 14"]), policy("same", &["Ghost"])];
        let changes = ResourceDiff {
            modified: vec![ResourceChange::named("changed")],
            ..Default::default()
        };

        let v = validate_labels(&proposed, &[], &[label("macOS 14", 12)], &changes);

        assert_eq!(v.valid.len(), 1);
        assert_eq!(v.valid[0].host_count, Some(12));
        assert!(v.missing.is_empty());
    }

    #[test]
    fn test_first_reference_wins() {
        let proposed = vec![policy("a", &["Missing"]), policy("b", &["Missing"])];
        let changes = ResourceDiff {
            added: vec![ResourceChange::named("a"), ResourceChange::named("b")],
            ..Default::default()
        };

        let v = validate_labels(&proposed, &[], &[], &changes);

        assert_eq!(v.missing.len(), 1);
        assert_eq!(v.missing[0].referenced_by, "a");
    }

    #[test]
    fn test_deleted_policies_use_remote_labels() {
        let remote = vec![RemotePolicy {
            name: "old".to_string(),
            labels_exclude_any: vec!["Servers".to_string()],
            ..Default::default()
        }];
        let changes = ResourceDiff {
            deleted: vec![ResourceChange::named("old")],
            ..Default::default()
        };

        let v = validate_labels(&[], &remote, &[label("Servers", 3)], &changes);

        assert_eq!(v.valid.len(), 1);
        assert_eq!(v.valid[0].referenced_by, "old");
    }

    #[test]
    fn test_no_changes_no_labels() {
        let proposed = vec![policy("p", &["Anything"])];
        let v = validate_labels(&proposed, &[], &[], &ResourceDiff::default());
        assert!(v.is_empty());
    }
}
