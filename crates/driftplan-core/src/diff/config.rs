//! Global configuration diffing.

use crate::diff::model::{ChangeKind, ConfigChange};
use crate::model::value::{flatten, lookup};
use crate::model::{ConfigMap, GlobalScope};
use crate::normalize::is_placeholder;

/// Where a declared section lives in the remote configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteLocation {
    /// Keys sit at the top level of the remote config.
    TopLevel,
    /// Keys sit under the named top-level key.
    Nested(&'static str),
}

/// Declared sections in comparison order, with their remote location.
pub const SECTIONS: &[(&str, RemoteLocation)] = &[
    ("org_settings", RemoteLocation::TopLevel),
    ("agent_options", RemoteLocation::Nested("agent_options")),
    ("controls", RemoteLocation::TopLevel),
];

fn declared<'a>(global: &'a GlobalScope, section: &str) -> Option<&'a ConfigMap> {
    match section {
        "org_settings" => global.org_settings.as_ref(),
        "agent_options" => global.agent_options.as_ref(),
        "controls" => global.controls.as_ref(),
        _ => None,
    }
}

fn locate(remote: &ConfigMap, location: RemoteLocation) -> Option<&ConfigMap> {
    match location {
        RemoteLocation::TopLevel => Some(remote),
        RemoteLocation::Nested(key) => remote.get(key).and_then(|v| v.as_map()),
    }
}

/// Compare every declared leaf against the remote config.
///
/// Leaves whose declared value contains `$` are environment placeholders
/// and are never compared.
pub(crate) fn diff_config(remote: &ConfigMap, global: &GlobalScope) -> Vec<ConfigChange> {
    let mut changes = Vec::new();

    for &(section, location) in SECTIONS {
        let Some(proposed) = declared(global, section) else {
            continue;
        };
        let remote_section = locate(remote, location);

        for (key, new) in flatten(proposed) {
            if is_placeholder(&new) {
                continue;
            }
            let old = remote_section.and_then(|m| lookup(m, &key)).map(|v| v.render());
            let kind = match &old {
                None => ChangeKind::Added,
                Some(old) if *old != new => ChangeKind::Modified,
                Some(_) => continue,
            };
            changes.push(ConfigChange {
                section: section.to_string(),
                key,
                old,
                new,
                kind,
            });
        }
    }

    changes
}

/// True when the global scope declares at least one config section.
pub(crate) fn declares_config(global: &GlobalScope) -> bool {
    SECTIONS
        .iter()
        .any(|(section, _)| declared(global, section).is_some())
}
