//! Parsing of the global declaration file (`default.yml`).

use crate::errors::{invalid_yaml, unexpected_shape, validation};
use crate::repo::documents::{
    dedupe, label_from_raw, load_documents, load_policies, load_queries, read_yaml,
};
use crate::repo::format::{RawGlobalFile, RawLabel};
use crate::repo::paths::RepoRoot;
use crate::repo::values::config_map;
use driftplan_core::errors::{ExErrorKind, ParseError};
use driftplan_core::model::{ConfigMap, GlobalScope, Label};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// What the global file contributes to the repository model.
#[derive(Debug, Default)]
pub(crate) struct GlobalFile {
    pub scope: GlobalScope,
    pub labels: Vec<Label>,
}

pub(crate) fn parse_global_file(
    root: &RepoRoot,
    file: &Path,
    errors: &mut Vec<ParseError>,
) -> Option<GlobalFile> {
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

    let org_settings = config_section(&mapping, "org_settings", file, errors);
    let agent_options = config_section(&mapping, "agent_options", file, errors);
    let controls = config_section(&mapping, "controls", file, errors);

    let raw: RawGlobalFile = match serde_yaml::from_value(Value::Mapping(mapping)) {
        Ok(raw) => raw,
        Err(e) => {
            errors.push(invalid_yaml(file, &e));
            return None;
        }
    };

    let base_dir = file.parent().unwrap_or_else(|| root.path());
    let labels: Vec<Label> =
        load_documents::<RawLabel>(root, base_dir, &raw.labels, file, "label ", errors)
            .into_iter()
            .map(|(source, label)| label_from_raw(source, label, errors))
            .collect();

    Some(GlobalFile {
        scope: GlobalScope {
            org_settings,
            agent_options,
            controls,
            policies: load_policies(root, base_dir, &raw.policies, file, errors),
            queries: load_queries(root, base_dir, &raw.queries, file, errors),
            source_file: file.to_path_buf(),
        },
        labels: dedupe(
            labels,
            "label name",
            |l: &Label| l.name.clone(),
            |l: &Label| l.source_file.clone(),
            errors,
        ),
    })
}

/// A free-form config section; absent or `null` sections are undeclared.
fn config_section(
    mapping: &Mapping,
    section: &str,
    file: &Path,
    errors: &mut Vec<ParseError>,
) -> Option<ConfigMap> {
    match mapping.get(section) {
        None | Some(Value::Null) => None,
        Some(Value::Mapping(m)) => Some(config_map(m)),
        Some(_) => {
            errors.push(validation(
                ExErrorKind::InvalidValue,
                file,
                format!("{:?} must be a mapping", section),
            ));
            None
        }
    }
}
