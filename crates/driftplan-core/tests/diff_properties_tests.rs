//! Property-based tests for normalization and matching laws.

mod common;

use common::*;
use driftplan_core::diff::diff;
use driftplan_core::model::{Group, RemoteGroup};
use driftplan_core::normalize::{normalize_software_path, normalize_ws};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn whitespace() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![" ", "\t", "\n", "\r\n", "  "]), 1..4)
        .prop_map(|parts| parts.concat())
}

/// A short SQL-ish text made of words joined by arbitrary whitespace runs.
fn spaced_text() -> impl Strategy<Value = (String, String)> {
    prop::collection::vec(("[A-Za-z0-9;*=]{1,8}", whitespace()), 1..8).prop_map(|words| {
        let canonical = words
            .iter()
            .map(|(w, _)| w.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let noisy: String = words.iter().map(|(w, ws)| format!("{}{}", w, ws)).collect();
        (canonical, noisy)
    })
}

fn names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-e]{1,2}", 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn normalize_ws_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize_ws(&s);
        prop_assert_eq!(normalize_ws(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn whitespace_noise_never_modifies(text in spaced_text(), lead in whitespace()) {
        let (canonical, noisy) = text;
        let mut group = Group::new("g");
        group.policies = vec![policy("p", &format!("{}{}", lead, noisy))];
        let remote = RemoteGroup {
            name: "g".to_string(),
            policies: vec![remote_policy("p", &canonical, 0, 0)],
            ..Default::default()
        };

        let results = diff(&snapshot_with(vec![remote]), &repo_with(vec![group]), None);

        prop_assert!(results[0].policies.is_empty());
    }

    #[test]
    fn software_path_normalization_is_idempotent(s in "[A-Za-z./\\\\]{0,24}") {
        let once = normalize_software_path(&s);
        prop_assert_eq!(normalize_software_path(&once), once.clone());
        prop_assert!(!once.starts_with('/'));
        prop_assert!(!once.starts_with("./") && !once.starts_with("../"));
    }

    #[test]
    fn buckets_partition_the_key_sets(proposed in names(), remote in names()) {
        let mut group = Group::new("g");
        group.policies = proposed.iter().map(|n| policy(n, "SELECT 1;")).collect();
        // Every shared key differs so it must land in Modified.
        let remote_group = RemoteGroup {
            name: "g".to_string(),
            policies: remote.iter().map(|n| remote_policy(n, "SELECT 2;", 0, 0)).collect(),
            ..Default::default()
        };

        let results = diff(&snapshot_with(vec![remote_group]), &repo_with(vec![group]), None);
        let policies = &results[0].policies;

        let collect = |v: &[driftplan_core::diff::ResourceChange]| -> BTreeSet<String> {
            v.iter().map(|c| c.name.clone()).collect()
        };
        let added = collect(policies.added.as_slice());
        let modified = collect(policies.modified.as_slice());
        let deleted = collect(policies.deleted.as_slice());

        let only_proposed: BTreeSet<String> = proposed.difference(&remote).cloned().collect();
        let shared: BTreeSet<String> = proposed.intersection(&remote).cloned().collect();
        let only_remote: BTreeSet<String> = remote.difference(&proposed).cloned().collect();
        prop_assert_eq!(added, only_proposed);
        prop_assert_eq!(modified, shared);
        prop_assert_eq!(deleted, only_remote);
        prop_assert_eq!(policies.total(), proposed.union(&remote).count());
    }
}
