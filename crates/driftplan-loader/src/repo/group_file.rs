//! Parsing of one group declaration file (`teams/*.yml`).

use crate::errors::{invalid_yaml, unexpected_shape, validation};
use crate::repo::documents::{
    dedupe, load_policies, load_queries, read_reference, read_yaml, single,
};
use crate::repo::format::{
    RawGroupFile, RawPackage, RawPathRef, RawSoftwareBlock, GROUP_FILE_KEYS,
};
use crate::repo::paths::RepoRoot;
use crate::repo::profile_identity::profile_name;
use driftplan_core::errors::{ExErrorKind, ParseError};
use driftplan_core::model::{
    Group, Profile, Software, SoftwarePackage, StoreApp, VendorMaintainedApp,
};
use driftplan_core::normalize::normalize_software_path;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Parse the group declared in `file`.
///
/// Returns `None` when the file cannot be read, does not parse, or lacks a
/// name; every problem found is appended to `errors`.
pub(crate) fn parse_group_file(
    root: &RepoRoot,
    file: &Path,
    errors: &mut Vec<ParseError>,
) -> Option<Group> {
    let mapping = match read_yaml(file) {
        Ok(Value::Mapping(m)) => m,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            errors.push(unexpected_shape(file, "a mapping"));
            return None;
        }
        Err(e) => {
            errors.push(e);
            return None;
        }
    };

    check_keys(&mapping, file, errors);

    let raw: RawGroupFile = match serde_yaml::from_value(Value::Mapping(mapping)) {
        Ok(raw) => raw,
        Err(e) => {
            errors.push(invalid_yaml(file, &e));
            return None;
        }
    };

    let name = match raw.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            errors.push(validation(
                ExErrorKind::MissingField,
                file,
                "missing required 'name' field",
            ));
            return None;
        }
    };

    let base_dir = file.parent().unwrap_or_else(|| root.path());
    let mut group = Group::new(name);
    group.source_file = file.to_path_buf();
    group.policies = load_policies(root, base_dir, &raw.policies, file, errors);
    group.queries = load_queries(root, base_dir, &raw.queries, file, errors);
    group.software = load_software(root, base_dir, raw.software, file, errors);

    let settings = [
        ("darwin", &raw.controls.macos_settings.custom_settings),
        ("windows", &raw.controls.windows_settings.custom_settings),
    ];
    for (platform, refs) in settings {
        group
            .profiles
            .extend(load_profiles(root, base_dir, refs, platform, file, errors));
    }

    Some(group)
}

fn check_keys(mapping: &Mapping, file: &Path, errors: &mut Vec<ParseError>) {
    for key in mapping.keys() {
        let known = key.as_str().is_some_and(|k| GROUP_FILE_KEYS.contains(&k));
        if !known {
            let shown = match key.as_str() {
                Some(k) => k.to_string(),
                None => format!("{:?}", key),
            };
            errors.push(validation(
                ExErrorKind::UnknownKey,
                file,
                format!("unknown top-level key: {:?}", shown),
            ));
        }
    }
}

fn load_software(
    root: &RepoRoot,
    base_dir: &Path,
    block: RawSoftwareBlock,
    file: &Path,
    errors: &mut Vec<ParseError>,
) -> Software {
    let mut packages = Vec::new();
    for entry in &block.packages {
        let loaded = read_reference(root, base_dir, entry.path.as_deref(), file, "software ")
            .and_then(|(resolved, doc)| Ok((single::<RawPackage>(&resolved, doc)?, resolved)));
        let (raw, resolved) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };
        let reference = entry.path.as_deref().map(str::trim).unwrap_or_default();
        let ref_path = root
            .relative(&root.declared(base_dir, reference))
            .map(|rel| normalize_software_path(&rel))
            .filter(|rel| !rel.is_empty())
            .unwrap_or_else(|| normalize_software_path(reference));
        packages.push(SoftwarePackage {
            ref_path,
            url: raw.url.trim().to_string(),
            hash_sha256: raw.hash_sha256.trim().to_string(),
            self_service: entry.self_service.unwrap_or(raw.self_service),
            source_file: resolved,
        });
    }

    let vendor_apps = block
        .fleet_maintained_apps
        .into_iter()
        .map(|app| VendorMaintainedApp {
            slug: app.slug.trim().to_string(),
            self_service: app.self_service,
        })
        .collect();
    let store_apps = block
        .app_store_apps
        .into_iter()
        .map(|app| StoreApp {
            store_id: app.app_store_id.trim().to_string(),
            self_service: app.self_service,
        })
        .collect();

    Software {
        packages: dedupe(
            packages,
            "software package reference",
            |p: &SoftwarePackage| p.ref_path.clone(),
            |_| file.to_path_buf(),
            errors,
        ),
        vendor_apps: dedupe(
            vendor_apps,
            "vendor app slug",
            |a: &VendorMaintainedApp| a.slug.to_lowercase(),
            |_| file.to_path_buf(),
            errors,
        ),
        store_apps: dedupe(
            store_apps,
            "store app id",
            |a: &StoreApp| a.store_id.clone(),
            |_| file.to_path_buf(),
            errors,
        ),
    }
}

fn load_profiles(
    root: &RepoRoot,
    base_dir: &Path,
    refs: &[RawPathRef],
    platform: &str,
    file: &Path,
    errors: &mut Vec<ParseError>,
) -> Vec<Profile> {
    let mut profiles = Vec::new();
    for r in refs {
        let reference = match r.path.as_deref().map(str::trim) {
            Some(reference) if !reference.is_empty() => reference,
            _ => {
                errors.push(validation(
                    ExErrorKind::EmptyReference,
                    file,
                    "empty profile path: reference",
                ));
                continue;
            }
        };
        let resolved = match root.resolve(base_dir, reference) {
            Ok(resolved) => resolved,
            Err(e) => {
                errors.push(e.into_parse_error(file));
                continue;
            }
        };
        let declared = root.declared(base_dir, reference);
        profiles.push(Profile {
            name: profile_name(&declared, &resolved),
            platform: platform.to_string(),
            path: root
                .relative(&declared)
                .unwrap_or_else(|| reference.to_string()),
            source_file: file.to_path_buf(),
        });
    }
    profiles
}
