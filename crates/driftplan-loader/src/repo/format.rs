//! Declaration file schema
//!
//! Raw YAML shapes for group files, the global file and the resource
//! documents they reference. Everything defaults so that missing keys are
//! caught by validation rather than by deserialization.

use serde::Deserialize;

/// Top-level keys a group file may contain.
pub const GROUP_FILE_KEYS: &[&str] = &[
    "name",
    "team_settings",
    "org_settings",
    "agent_options",
    "controls",
    "policies",
    "queries",
    "software",
    "labels",
];

/// A group declaration (`teams/*.yml`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGroupFile {
    pub name: Option<String>,
    pub policies: Vec<RawPathRef>,
    pub queries: Vec<RawPathRef>,
    pub software: RawSoftwareBlock,
    pub controls: RawControls,
}

/// The global declaration (`default.yml`), reference lists only.
///
/// The config sections are read from the untyped document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGlobalFile {
    pub policies: Vec<RawPathRef>,
    pub queries: Vec<RawPathRef>,
    pub labels: Vec<RawPathRef>,
}

/// A `- path: <file>` entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPathRef {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSoftwareBlock {
    pub packages: Vec<RawSoftwareRef>,
    #[serde(alias = "vendor_maintained_apps")]
    pub fleet_maintained_apps: Vec<RawVendorApp>,
    #[serde(alias = "store_apps")]
    pub app_store_apps: Vec<RawStoreApp>,
}

/// A package reference; `self_service` here overrides the package file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSoftwareRef {
    pub path: Option<String>,
    pub self_service: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVendorApp {
    pub slug: String,
    pub self_service: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStoreApp {
    #[serde(alias = "store_id")]
    pub app_store_id: String,
    pub self_service: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawControls {
    pub macos_settings: RawCustomSettings,
    pub windows_settings: RawCustomSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCustomSettings {
    pub custom_settings: Vec<RawPathRef>,
}

// ---------- Referenced documents ----------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPolicy {
    pub name: String,
    pub description: String,
    pub resolution: String,
    pub query: String,
    pub platform: String,
    pub critical: bool,
    pub labels_include_any: Vec<String>,
    pub labels_exclude_any: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuery {
    pub name: String,
    pub query: String,
    pub interval: u32,
    pub platform: String,
    pub logging: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPackage {
    pub url: String,
    pub hash_sha256: String,
    pub self_service: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLabel {
    pub name: String,
    pub description: String,
    pub query: String,
    pub platform: String,
    pub label_membership_type: String,
}
