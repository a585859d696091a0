//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections are sorted `Vec`s and `BTreeMap`s so serialized output is
//! deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The diff for one group, or for the global scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiffResult {
    /// Group name, or [`GLOBAL_SCOPE`](super::GLOBAL_SCOPE) for the global declaration
    pub group: String,
    pub policies: ResourceDiff,
    pub queries: ResourceDiff,
    pub software: ResourceDiff,
    pub profiles: ResourceDiff,
    /// Label references of changed policies
    pub labels: LabelValidation,
    /// Global configuration changes (global scope only)
    pub config: Vec<ConfigChange>,
    /// Informational notes and warnings raised while diffing
    pub messages: Vec<DiffMessage>,
}

impl DiffResult {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Default::default()
        }
    }

    /// True when any bucket or the config list holds a change.
    pub fn has_changes(&self) -> bool {
        !self.policies.is_empty()
            || !self.queries.is_empty()
            || !self.software.is_empty()
            || !self.profiles.is_empty()
            || !self.config.is_empty()
    }

    /// The four resource buckets with their display names, in render order.
    pub fn buckets(&self) -> [(&'static str, &ResourceDiff); 4] {
        [
            ("Policies", &self.policies),
            ("Queries", &self.queries),
            ("Software", &self.software),
            ("Profiles", &self.profiles),
        ]
    }

    pub(crate) fn info(&mut self, text: impl Into<String>) {
        self.messages.push(DiffMessage::new(Severity::Info, text));
    }

    pub(crate) fn warn(&mut self, text: impl Into<String>) {
        self.messages.push(DiffMessage::new(Severity::Warning, text));
    }
}

/// Changes to one resource collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceDiff {
    pub added: Vec<ResourceChange>,
    pub modified: Vec<ResourceChange>,
    pub deleted: Vec<ResourceChange>,
}

impl ResourceDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Names of every entry in all three buckets.
    pub fn changed_names(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .chain(self.deleted.iter())
            .map(|c| c.name.as_str())
    }

    /// Append every entry of `other` to the matching bucket.
    pub(crate) fn extend(&mut self, other: ResourceDiff) {
        self.added.extend(other.added);
        self.modified.extend(other.modified);
        self.deleted.extend(other.deleted);
    }

    pub(crate) fn sort(&mut self) {
        self.added.sort_by(|a, b| a.name.cmp(&b.name));
        self.modified.sort_by(|a, b| a.name.cmp(&b.name));
        self.deleted.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// A single added, modified or deleted resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceChange {
    pub name: String,
    /// Field name to old/new value
    pub fields: BTreeMap<String, FieldDiff>,
    /// Hosts affected, when the platform reports usage for this resource
    pub host_count: Option<u64>,
    /// Impact warning attached to a deletion
    pub warning: Option<String>,
}

impl ResourceChange {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn with_field(mut self, field: &str, diff: FieldDiff) -> Self {
        self.fields.insert(field.to_string(), diff);
        self
    }
}

/// Old and new value of one field. `old` is `None` for additions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDiff {
    pub old: Option<String>,
    pub new: Option<String>,
}

impl FieldDiff {
    pub fn added(new: impl Into<String>) -> Self {
        Self {
            old: None,
            new: Some(new.into()),
        }
    }

    pub fn changed(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: Some(old.into()),
            new: Some(new.into()),
        }
    }
}

/// Label cross-reference status for the changed policies of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelValidation {
    pub valid: Vec<LabelRef>,
    pub missing: Vec<LabelRef>,
}

impl LabelValidation {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelRef {
    pub name: String,
    /// Remote host count; only known for valid labels
    pub host_count: Option<u64>,
    /// The first changed policy that references this label
    pub referenced_by: String,
}

/// Kind of a configuration change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
}

/// One changed leaf of a global configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigChange {
    /// `org_settings`, `agent_options` or `controls`
    pub section: String,
    /// Dot-separated key path inside the section
    pub key: String,
    pub old: Option<String>,
    pub new: String,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffMessage {
    pub severity: Severity,
    pub text: String,
}

impl DiffMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}
