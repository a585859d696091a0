//! Platform tag-sets and the enum vocabularies of the declaration schema.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Platform identifiers accepted by the managed platform.
pub const VALID_PLATFORMS: &[&str] = &["darwin", "windows", "linux", "chrome"];

/// A comma-separated platform list compared as a set.
///
/// `"darwin,linux"` and `"linux, darwin"` are the same set. An empty set
/// means "all platforms".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlatformSet(BTreeSet<String>);

impl PlatformSet {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Tags that are not in [`VALID_PLATFORMS`], in sorted order.
    pub fn invalid_tags(&self) -> Vec<&str> {
        self.iter()
            .filter(|p| !VALID_PLATFORMS.contains(p))
            .collect()
    }

    /// Drop every tag outside [`VALID_PLATFORMS`].
    pub fn retain_valid(&mut self) {
        self.0.retain(|p| VALID_PLATFORMS.contains(&p.as_str()));
    }
}

impl fmt::Display for PlatformSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

impl From<String> for PlatformSet {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for PlatformSet {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<PlatformSet> for String {
    fn from(set: PlatformSet) -> Self {
        set.to_string()
    }
}

/// Result logging mode of a scheduled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingMode {
    Snapshot,
    Differential,
    DifferentialIgnoreRemovals,
}

impl LoggingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingMode::Snapshot => "snapshot",
            LoggingMode::Differential => "differential",
            LoggingMode::DifferentialIgnoreRemovals => "differential_ignore_removals",
        }
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snapshot" => Ok(LoggingMode::Snapshot),
            "differential" => Ok(LoggingMode::Differential),
            "differential_ignore_removals" => Ok(LoggingMode::DifferentialIgnoreRemovals),
            other => Err(format!("invalid logging mode: {:?}", other)),
        }
    }
}

/// How hosts become members of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMembership {
    Dynamic,
    Manual,
    HostVitals,
}

impl FromStr for LabelMembership {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dynamic" => Ok(LabelMembership::Dynamic),
            "manual" => Ok(LabelMembership::Manual),
            "host_vitals" => Ok(LabelMembership::HostVitals),
            other => Err(format!("invalid label membership type: {:?}", other)),
        }
    }
}

/// Deserialize an optional logging mode where the empty string means unset.
pub(crate) fn deserialize_logging<'de, D>(deserializer: D) -> Result<Option<LoggingMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
