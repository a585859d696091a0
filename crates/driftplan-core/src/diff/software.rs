//! Software matching: custom packages, vendor-maintained apps and store apps.
//!
//! The three kinds are matched independently and merged into one bucket.
//! Entry names are the canonical package path, `vendor app <slug>` or
//! `store app <id>`.

use crate::diff::model::{FieldDiff, ResourceChange, ResourceDiff};
use crate::model::{
    RemotePackage, RemoteSoftware, RemoteStoreApp, RemoteVendorApp, Software, SoftwarePackage,
    StoreApp, VendorMaintainedApp,
};
use crate::normalize::normalize_software_path;
use std::collections::BTreeMap;
use std::path::Path;

pub(crate) fn diff_software(remote: &RemoteSoftware, proposed: &Software) -> ResourceDiff {
    let mut diff = diff_packages(&remote.packages, &proposed.packages);
    diff.extend(diff_vendor_apps(
        remote.vendor_apps.as_deref().unwrap_or_default(),
        &proposed.vendor_apps,
    ));
    diff.extend(diff_store_apps(&remote.store_apps, &proposed.store_apps));
    diff.sort();
    diff
}

fn remote_package_key(p: &RemotePackage) -> String {
    let key = normalize_software_path(&p.referenced_yaml_path);
    if key.is_empty() {
        normalize_software_path(&p.url)
    } else {
        key
    }
}

fn proposed_package_key(p: &SoftwarePackage) -> String {
    let key = normalize_software_path(&p.ref_path);
    if !key.is_empty() {
        return key;
    }
    let inferred = path_from_source(&p.source_file);
    if !inferred.is_empty() {
        return inferred;
    }
    normalize_software_path(&p.url)
}

/// Package path taken from the `software/` segment of a source file path.
fn path_from_source(source: &Path) -> String {
    let source = source.to_string_lossy().replace('\\', "/");
    match source.find("/software/") {
        Some(idx) => normalize_software_path(&source[idx + 1..]),
        None => String::new(),
    }
}

fn diff_packages(remote: &[RemotePackage], proposed: &[SoftwarePackage]) -> ResourceDiff {
    let mut diff = ResourceDiff::default();

    let current: BTreeMap<String, &RemotePackage> = remote
        .iter()
        .map(|p| (remote_package_key(p), p))
        .filter(|(k, _)| !k.is_empty())
        .collect();
    let mut wanted: BTreeMap<String, &SoftwarePackage> = BTreeMap::new();
    for p in proposed {
        let key = proposed_package_key(p);
        if !key.is_empty() {
            wanted.entry(key).or_insert(p);
        }
    }

    for (key, p) in &wanted {
        let Some(cur) = current.get(key) else {
            let mut change = ResourceChange::named(key)
                .with_field("url", FieldDiff::added(&p.url))
                .with_field("self_service", FieldDiff::added(p.self_service.to_string()));
            if !p.hash_sha256.is_empty() {
                change = change.with_field("hash_sha256", FieldDiff::added(&p.hash_sha256));
            }
            diff.added.push(change);
            continue;
        };

        let mut change = ResourceChange::named(key);
        if cur.url != p.url {
            change = change.with_field("url", FieldDiff::changed(&cur.url, &p.url));
        }
        if cur.hash_sha256 != p.hash_sha256 {
            change = change.with_field(
                "hash_sha256",
                FieldDiff::changed(&cur.hash_sha256, &p.hash_sha256),
            );
        }
        if cur.self_service != p.self_service {
            change = change.with_field("self_service", self_service_change(cur.self_service, p.self_service));
        }
        if !change.fields.is_empty() {
            diff.modified.push(change);
        }
    }

    for key in current.keys().filter(|k| !wanted.contains_key(*k)) {
        diff.deleted.push(ResourceChange::named(key));
    }

    diff
}

fn self_service_change(old: bool, new: bool) -> FieldDiff {
    FieldDiff::changed(old.to_string(), new.to_string())
}

/// Shared matching for the two app kinds, which differ only in key and naming.
fn diff_apps<R, P>(
    remote: &[R],
    proposed: &[P],
    remote_key: impl Fn(&R) -> (String, bool),
    proposed_key: impl Fn(&P) -> (String, bool),
    label: &str,
    id_field: &str,
) -> ResourceDiff {
    let mut diff = ResourceDiff::default();

    let current: BTreeMap<String, bool> = remote
        .iter()
        .map(remote_key)
        .filter(|(k, _)| !k.is_empty())
        .collect();
    let mut wanted: BTreeMap<String, bool> = BTreeMap::new();
    for (key, self_service) in proposed.iter().map(proposed_key) {
        if !key.is_empty() {
            wanted.entry(key).or_insert(self_service);
        }
    }

    for (key, &self_service) in &wanted {
        let name = format!("{} {}", label, key);
        match current.get(key) {
            None => diff.added.push(
                ResourceChange::named(name)
                    .with_field(id_field, FieldDiff::added(key))
                    .with_field("self_service", FieldDiff::added(self_service.to_string())),
            ),
            Some(&cur) if cur != self_service => diff.modified.push(
                ResourceChange::named(name)
                    .with_field("self_service", self_service_change(cur, self_service)),
            ),
            Some(_) => {}
        }
    }

    for key in current.keys().filter(|k| !wanted.contains_key(*k)) {
        diff.deleted.push(ResourceChange::named(format!("{} {}", label, key)));
    }

    diff
}

fn diff_vendor_apps(remote: &[RemoteVendorApp], proposed: &[VendorMaintainedApp]) -> ResourceDiff {
    diff_apps(
        remote,
        proposed,
        |a| (normalize_software_path(&a.slug), a.self_service),
        |a| (normalize_software_path(&a.slug), a.self_service),
        "vendor app",
        "slug",
    )
}

fn diff_store_apps(remote: &[RemoteStoreApp], proposed: &[StoreApp]) -> ResourceDiff {
    diff_apps(
        remote,
        proposed,
        |a| (a.store_id.trim().to_string(), a.self_service),
        |a| (a.store_id.trim().to_string(), a.self_service),
        "store app",
        "store_id",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn package(ref_path: &str, url: &str) -> SoftwarePackage {
        SoftwarePackage {
            ref_path: ref_path.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_package_matches_on_referenced_path_spelling() {
        let remote = RemoteSoftware {
            packages: vec![RemotePackage {
                url: "https://dl.example.test/firefox.pkg".to_string(),
                referenced_yaml_path: "./lib/Software/Firefox.yml".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let proposed = Software {
            packages: vec![package("lib/software/firefox.yml", "https://dl.example.test/firefox.pkg")],
            ..Default::default()
        };

        assert!(diff_software(&remote, &proposed).is_empty());
    }

    #[test]
    fn test_package_falls_back_to_url_key() {
        let remote = RemoteSoftware {
            packages: vec![RemotePackage {
                url: "https://dl.example.test/Tool.pkg".to_string(),
                self_service: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let proposed = Software {
            packages: vec![package("", "https://dl.example.test/tool.pkg")],
            ..Default::default()
        };

        let diff = diff_software(&remote, &proposed);

        assert_eq!(diff.modified.len(), 1);
        assert_eq!(diff.modified[0].name, "https://dl.example.test/tool.pkg");
        assert!(diff.modified[0].fields.contains_key("self_service"));
    }

    #[test]
    fn test_package_key_inferred_from_source_file() {
        let p = SoftwarePackage {
            source_file: PathBuf::from("/repo/lib/software/zoom.yml"),
            url: "https://dl.example.test/zoom.pkg".to_string(),
            ..Default::default()
        };
        assert_eq!(proposed_package_key(&p), "software/zoom.yml");
    }

    #[test]
    fn test_app_kinds_are_named_and_merged() {
        let remote = RemoteSoftware {
            vendor_apps: Some(vec![RemoteVendorApp {
                slug: "slack/darwin".to_string(),
                self_service: false,
            }]),
            store_apps: vec![RemoteStoreApp {
                store_id: "409183694".to_string(),
                self_service: false,
            }],
            ..Default::default()
        };
        let proposed = Software {
            vendor_apps: vec![VendorMaintainedApp {
                slug: "Slack/darwin".to_string(),
                self_service: true,
            }],
            store_apps: vec![StoreApp {
                store_id: " 497799835 ".to_string(),
                self_service: false,
            }],
            ..Default::default()
        };

        let diff = diff_software(&remote, &proposed);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].name, "store app 497799835");
        assert_eq!(diff.modified.len(), 1);
        assert_eq!(diff.modified[0].name, "vendor app slack/darwin");
        assert_eq!(diff.deleted.len(), 1);
        assert_eq!(diff.deleted[0].name, "store app 409183694");
    }

    #[test]
    fn test_missing_vendor_list_diffs_as_empty() {
        let proposed = Software {
            vendor_apps: vec![VendorMaintainedApp {
                slug: "zoom/darwin".to_string(),
                self_service: false,
            }],
            ..Default::default()
        };

        let diff = diff_software(&RemoteSoftware::default(), &proposed);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].fields["slug"], FieldDiff::added("zoom/darwin"));
    }
}
