//! Typed current-state snapshot.
//!
//! A fetch layer fills these records from the platform API; the diff engine
//! only reads them. Every field defaults so partial snapshots deserialize.

use super::kinds::{deserialize_logging, LoggingMode, PlatformSet};
use super::value::ConfigMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSnapshot {
    pub groups: Vec<RemoteGroup>,
    pub labels: Vec<RemoteLabel>,
    /// Global configuration; `None` when it was not fetched.
    pub config: Option<ConfigMap>,
    pub global_policies: Option<Vec<RemotePolicy>>,
    pub global_queries: Option<Vec<RemoteQuery>>,
    /// Vendor-maintained app catalog; `None` when unavailable.
    pub vendor_catalog: Option<Vec<CatalogApp>>,
}

impl RemoteSnapshot {
    /// Find a group by exact name.
    pub fn group(&self, name: &str) -> Option<&RemoteGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn label(&self, name: &str) -> Option<&RemoteLabel> {
        self.labels.iter().find(|l| l.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteGroup {
    pub id: u64,
    pub name: String,
    pub policies: Vec<RemotePolicy>,
    pub queries: Vec<RemoteQuery>,
    pub profiles: Vec<RemoteProfile>,
    pub software: RemoteSoftware,
    pub software_titles: Vec<SoftwareTitle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSoftware {
    pub packages: Vec<RemotePackage>,
    /// `None` when the platform omitted the list from its response.
    pub vendor_apps: Option<Vec<RemoteVendorApp>>,
    pub store_apps: Vec<RemoteStoreApp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotePackage {
    pub url: String,
    pub hash_sha256: String,
    pub self_service: bool,
    /// Path of the declaration the package was applied from, if recorded.
    pub referenced_yaml_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteVendorApp {
    pub slug: String,
    pub self_service: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteStoreApp {
    pub store_id: String,
    pub self_service: bool,
}

/// An entry of the vendor-maintained app catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogApp {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotePolicy {
    pub id: u64,
    pub name: String,
    pub query: String,
    pub description: String,
    pub resolution: String,
    pub platform: PlatformSet,
    pub critical: bool,
    pub passing_host_count: u64,
    pub failing_host_count: u64,
    pub labels_include_any: Vec<String>,
    pub labels_exclude_any: Vec<String>,
}

impl RemotePolicy {
    /// Hosts the policy has been evaluated on; saturates at `u64::MAX`.
    pub fn host_count(&self) -> u64 {
        self.passing_host_count
            .saturating_add(self.failing_host_count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteQuery {
    pub id: u64,
    pub name: String,
    pub query: String,
    pub interval: u32,
    pub platform: PlatformSet,
    #[serde(deserialize_with = "deserialize_logging")]
    pub logging: Option<LoggingMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteProfile {
    pub profile_uuid: String,
    pub name: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteLabel {
    pub id: u64,
    pub name: String,
    pub host_count: u64,
}

/// An installed-software title reported for a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareTitle {
    pub id: u64,
    pub name: String,
    pub source: String,
    pub hosts_count: u64,
    pub store_app: Option<TitleStoreApp>,
    pub software_package: Option<TitlePackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePackage {
    pub name: String,
    pub package_url: String,
    pub self_service: bool,
    pub platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleStoreApp {
    pub store_id: String,
    pub self_service: bool,
    pub platform: String,
}
