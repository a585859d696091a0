//! The normalized desired-state model produced by the loader.

use super::kinds::{LabelMembership, LoggingMode, PlatformSet};
use super::value::ConfigMap;
use crate::errors::ParseError;
use std::path::PathBuf;

/// Everything loaded from one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRepo {
    /// Groups in declaration order (sorted by file name).
    pub groups: Vec<Group>,
    /// Labels declared by the global file.
    pub labels: Vec<Label>,
    pub global: Option<GlobalScope>,
    /// Non-fatal problems recorded while loading.
    pub errors: Vec<ParseError>,
}

impl ParsedRepo {
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub policies: Vec<Policy>,
    pub queries: Vec<Query>,
    pub software: Software,
    pub profiles: Vec<Profile>,
    pub source_file: PathBuf,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Repository-wide settings and resources from the global declaration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalScope {
    pub org_settings: Option<ConfigMap>,
    pub agent_options: Option<ConfigMap>,
    pub controls: Option<ConfigMap>,
    pub policies: Vec<Policy>,
    pub queries: Vec<Query>,
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Policy {
    pub name: String,
    pub query: String,
    pub description: String,
    pub resolution: String,
    pub platform: PlatformSet,
    pub critical: bool,
    pub labels_include_any: Vec<String>,
    pub labels_exclude_any: Vec<String>,
    pub source_file: PathBuf,
}

impl Policy {
    /// Label names referenced by this policy, include list first.
    pub fn label_refs(&self) -> impl Iterator<Item = &str> {
        self.labels_include_any
            .iter()
            .chain(self.labels_exclude_any.iter())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub name: String,
    pub query: String,
    /// Seconds between runs.
    pub interval: u32,
    pub platform: PlatformSet,
    pub logging: Option<LoggingMode>,
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Software {
    pub packages: Vec<SoftwarePackage>,
    pub vendor_apps: Vec<VendorMaintainedApp>,
    pub store_apps: Vec<StoreApp>,
}

impl Software {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.vendor_apps.is_empty() && self.store_apps.is_empty()
    }
}

/// A custom installer package declared through a `path:` reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoftwarePackage {
    /// Canonical repository-relative path of the package file.
    pub ref_path: String,
    pub url: String,
    pub hash_sha256: String,
    pub self_service: bool,
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorMaintainedApp {
    pub slug: String,
    pub self_service: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreApp {
    pub store_id: String,
    pub self_service: bool,
}

/// A configuration profile, identified by its display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: String,
    pub platform: String,
    /// Repository-relative path of the profile document.
    pub path: String,
    pub source_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    pub name: String,
    pub description: String,
    pub query: String,
    pub platform: PlatformSet,
    pub membership: Option<LabelMembership>,
    pub source_file: PathBuf,
}
