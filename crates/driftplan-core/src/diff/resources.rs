//! Policy, query and profile matching.

use crate::diff::model::{FieldDiff, ResourceChange, ResourceDiff};
use crate::model::{Policy, Profile, Query, RemotePolicy, RemoteProfile, RemoteQuery};
use crate::normalize::normalize_ws;
use std::collections::{BTreeMap, BTreeSet};

/// Record `field` when the two rendered values differ.
fn compare(fields: &mut BTreeMap<String, FieldDiff>, field: &str, old: String, new: String) {
    if old != new {
        fields.insert(field.to_string(), FieldDiff::changed(old, new));
    }
}

fn non_zero(count: u64) -> Option<u64> {
    (count > 0).then_some(count)
}

/// Remote records not claimed by any proposed key, one entry per name.
fn deletions<'a, T>(
    remote: &'a [T],
    name_of: impl Fn(&T) -> &str,
    proposed: &BTreeSet<&str>,
) -> Vec<&'a T> {
    let mut seen = BTreeSet::new();
    remote
        .iter()
        .filter(|r| !proposed.contains(name_of(r)) && seen.insert(name_of(r).to_string()))
        .collect()
}

pub(crate) fn diff_policies(remote: &[RemotePolicy], proposed: &[Policy]) -> ResourceDiff {
    let mut diff = ResourceDiff::default();
    let remote_by_name: BTreeMap<&str, &RemotePolicy> =
        remote.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut proposed_names = BTreeSet::new();
    for p in proposed {
        if !proposed_names.insert(p.name.as_str()) {
            continue;
        }
        let Some(cur) = remote_by_name.get(p.name.as_str()) else {
            let mut change = ResourceChange::named(&p.name)
                .with_field("query", FieldDiff::added(normalize_ws(&p.query)))
                .with_field("platform", FieldDiff::added(p.platform.to_string()))
                .with_field("critical", FieldDiff::added(p.critical.to_string()));
            if !p.description.is_empty() {
                change = change.with_field("description", FieldDiff::added(normalize_ws(&p.description)));
            }
            if !p.resolution.is_empty() {
                change = change.with_field("resolution", FieldDiff::added(normalize_ws(&p.resolution)));
            }
            diff.added.push(change);
            continue;
        };

        let mut fields = BTreeMap::new();
        compare(&mut fields, "query", normalize_ws(&cur.query), normalize_ws(&p.query));
        compare(
            &mut fields,
            "description",
            normalize_ws(&cur.description),
            normalize_ws(&p.description),
        );
        compare(
            &mut fields,
            "resolution",
            normalize_ws(&cur.resolution),
            normalize_ws(&p.resolution),
        );
        if cur.platform != p.platform {
            compare(&mut fields, "platform", cur.platform.to_string(), p.platform.to_string());
        }
        compare(&mut fields, "critical", cur.critical.to_string(), p.critical.to_string());

        if !fields.is_empty() {
            diff.modified.push(ResourceChange {
                name: p.name.clone(),
                fields,
                host_count: non_zero(cur.host_count()),
                warning: None,
            });
        }
    }

    for cur in deletions(remote, |p| p.name.as_str(), &proposed_names) {
        let hosts = cur.host_count();
        diff.deleted.push(ResourceChange {
            name: cur.name.clone(),
            fields: BTreeMap::new(),
            host_count: non_zero(hosts),
            warning: (hosts > 0).then(|| format!("will delete policy affecting {} hosts", hosts)),
        });
    }

    diff.sort();
    diff
}

pub(crate) fn diff_queries(remote: &[RemoteQuery], proposed: &[Query]) -> ResourceDiff {
    let mut diff = ResourceDiff::default();
    let remote_by_name: BTreeMap<&str, &RemoteQuery> =
        remote.iter().map(|q| (q.name.as_str(), q)).collect();

    let mut proposed_names = BTreeSet::new();
    for q in proposed {
        if !proposed_names.insert(q.name.as_str()) {
            continue;
        }
        let Some(cur) = remote_by_name.get(q.name.as_str()) else {
            let mut change = ResourceChange::named(&q.name)
                .with_field("query", FieldDiff::added(normalize_ws(&q.query)))
                .with_field("interval", FieldDiff::added(q.interval.to_string()))
                .with_field("platform", FieldDiff::added(q.platform.to_string()));
            if let Some(logging) = q.logging {
                change = change.with_field("logging", FieldDiff::added(logging.as_str()));
            }
            diff.added.push(change);
            continue;
        };

        let mut fields = BTreeMap::new();
        compare(&mut fields, "query", normalize_ws(&cur.query), normalize_ws(&q.query));
        compare(&mut fields, "interval", cur.interval.to_string(), q.interval.to_string());
        if cur.platform != q.platform {
            compare(&mut fields, "platform", cur.platform.to_string(), q.platform.to_string());
        }
        // An unset logging mode keeps whatever the platform has.
        if let Some(logging) = q.logging {
            if cur.logging != Some(logging) {
                let old = cur.logging.map(|l| l.as_str()).unwrap_or_default();
                fields.insert(
                    "logging".to_string(),
                    FieldDiff::changed(old, logging.as_str()),
                );
            }
        }

        if !fields.is_empty() {
            diff.modified.push(ResourceChange {
                name: q.name.clone(),
                fields,
                ..Default::default()
            });
        }
    }

    for cur in deletions(remote, |q| q.name.as_str(), &proposed_names) {
        diff.deleted.push(ResourceChange::named(&cur.name));
    }

    diff.sort();
    diff
}

/// Diff profiles by display name.
///
/// Returns the diff and one warning per proposed profile whose name collides
/// with an earlier one. The first profile with a given name is the one
/// matched.
pub(crate) fn diff_profiles(
    remote: &[RemoteProfile],
    proposed: &[Profile],
) -> (ResourceDiff, Vec<String>) {
    let mut diff = ResourceDiff::default();
    let mut warnings = Vec::new();
    let remote_by_name: BTreeMap<&str, &RemoteProfile> =
        remote.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut proposed_names = BTreeSet::new();
    for p in proposed {
        if !proposed_names.insert(p.name.as_str()) {
            warnings.push(format!(
                "duplicate profile name {:?} derived from {:?} (conflicts with another profile)",
                p.name, p.path
            ));
            continue;
        }
        match remote_by_name.get(p.name.as_str()) {
            None => {
                let mut change = ResourceChange::named(&p.name)
                    .with_field("platform", FieldDiff::added(&p.platform));
                if !p.path.is_empty() {
                    change = change.with_field("path", FieldDiff::added(&p.path));
                }
                diff.added.push(change);
            }
            Some(cur) if cur.platform != p.platform => {
                diff.modified.push(
                    ResourceChange::named(&p.name)
                        .with_field("platform", FieldDiff::changed(&cur.platform, &p.platform)),
                );
            }
            Some(_) => {}
        }
    }

    for cur in deletions(remote, |p| p.name.as_str(), &proposed_names) {
        diff.deleted.push(ResourceChange::named(&cur.name));
    }

    diff.sort();
    (diff, warnings)
}
