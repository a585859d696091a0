//! Reconstruction of a group's vendor-maintained apps from its software titles.
//!
//! Some platform responses omit the vendor-app list for a group even though
//! apps are installed. When that happens the list is rebuilt from the
//! group's software titles and the vendor catalog. Anything that cannot be
//! matched unambiguously is left out; the caller then sees a plain addition.

use crate::model::{CatalogApp, RemoteGroup, RemoteVendorApp};
use crate::normalize::{catalog_key, normalize_software_path};
use std::collections::{BTreeMap, BTreeSet};

/// Title source that marks an installable application.
const APP_SOURCE: &str = "apps";

/// Rebuild the vendor-app list for `group`.
///
/// Returns `None` when there is no catalog, no titles, or no title matches
/// exactly one catalog entry.
pub fn infer_vendor_apps(
    group: &RemoteGroup,
    catalog: Option<&[CatalogApp]>,
) -> Option<Vec<RemoteVendorApp>> {
    let catalog = catalog.filter(|c| !c.is_empty())?;
    if group.software_titles.is_empty() {
        return None;
    }

    let custom_urls: BTreeSet<String> = group
        .software
        .packages
        .iter()
        .map(|p| normalize_software_path(&p.url))
        .filter(|u| !u.is_empty())
        .collect();

    let mut by_key: BTreeMap<String, Vec<&CatalogApp>> = BTreeMap::new();
    for app in catalog {
        if let Some(key) = catalog_key(&app.name, &app.platform) {
            by_key.entry(key).or_default().push(app);
        }
    }

    let mut inferred: BTreeMap<String, bool> = BTreeMap::new();
    for title in &group.software_titles {
        if !title.source.trim().eq_ignore_ascii_case(APP_SOURCE) || title.store_app.is_some() {
            continue;
        }
        let Some(package) = &title.software_package else {
            continue;
        };
        let url = normalize_software_path(&package.package_url);
        if !url.is_empty() && custom_urls.contains(&url) {
            continue;
        }
        let Some(key) = catalog_key(&title.name, &package.platform) else {
            continue;
        };
        let [only] = by_key.get(&key).map(Vec::as_slice).unwrap_or_default() else {
            continue;
        };
        let slug = normalize_software_path(&only.slug);
        if !slug.is_empty() {
            inferred.insert(slug, package.self_service);
        }
    }

    if inferred.is_empty() {
        return None;
    }
    tracing::debug!(
        group = %group.name,
        inferred = inferred.len(),
        "Rebuilt vendor app list from software titles"
    );
    Some(
        inferred
            .into_iter()
            .map(|(slug, self_service)| RemoteVendorApp { slug, self_service })
            .collect(),
    )
}
