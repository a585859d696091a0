//! Reading referenced resource documents and converting them to the model.

use crate::errors::{file_unreadable, invalid_yaml, unexpected_shape, validation};
use crate::repo::format::{RawLabel, RawPathRef, RawPolicy, RawQuery};
use crate::repo::paths::RepoRoot;
use driftplan_core::errors::{ExErrorKind, ParseError};
use driftplan_core::model::{Label, PlatformSet, Policy, Query};
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse a YAML file.
pub(crate) fn read_yaml(file: &Path) -> Result<Value, ParseError> {
    let content = fs::read_to_string(file).map_err(|e| file_unreadable(file, &e))?;
    serde_yaml::from_str(&content).map_err(|e| invalid_yaml(file, &e))
}

/// Resolve a `path:` reference and read the document it points to.
///
/// Resolution and read failures are attributed to `parent`; syntax errors
/// to the referenced file itself. `what` prefixes the reference kind in
/// messages (`"software "`, `"label "`, or empty).
pub(crate) fn read_reference(
    root: &RepoRoot,
    base_dir: &Path,
    reference: Option<&str>,
    parent: &Path,
    what: &str,
) -> Result<(PathBuf, Value), ParseError> {
    let reference = match reference.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => {
            return Err(validation(
                ExErrorKind::EmptyReference,
                parent,
                format!("empty {}path: reference", what),
            ))
        }
    };

    let resolved = root
        .resolve(base_dir, reference)
        .map_err(|e| e.into_parse_error(parent))?;
    let content = fs::read_to_string(&resolved).map_err(|e| {
        ParseError::new(
            ExErrorKind::FileUnreadable,
            parent,
            format!("{}path reference {:?}: {}", what, reference, e),
        )
    })?;
    let doc = serde_yaml::from_str(&content).map_err(|e| invalid_yaml(&resolved, &e))?;
    Ok((resolved, doc))
}

/// Deserialize a document holding either a list of items or a single item.
pub(crate) fn list_or_single<T: DeserializeOwned>(
    file: &Path,
    doc: Value,
) -> Result<Vec<T>, ParseError> {
    match doc {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(_) => serde_yaml::from_value(doc).map_err(|e| invalid_yaml(file, &e)),
        Value::Mapping(_) => serde_yaml::from_value(doc)
            .map(|item| vec![item])
            .map_err(|e| invalid_yaml(file, &e)),
        _ => Err(unexpected_shape(file, "a list or a mapping")),
    }
}

/// Deserialize a document holding exactly one mapping.
pub(crate) fn single<T: DeserializeOwned>(file: &Path, doc: Value) -> Result<T, ParseError> {
    match doc {
        Value::Mapping(_) => serde_yaml::from_value(doc).map_err(|e| invalid_yaml(file, &e)),
        _ => Err(unexpected_shape(file, "a mapping")),
    }
}

/// Load every list-or-single document behind `refs`, tagging items with their file.
pub(crate) fn load_documents<T: DeserializeOwned>(
    root: &RepoRoot,
    base_dir: &Path,
    refs: &[RawPathRef],
    parent: &Path,
    what: &str,
    errors: &mut Vec<ParseError>,
) -> Vec<(PathBuf, T)> {
    let mut out = Vec::new();
    for r in refs {
        let loaded = read_reference(root, base_dir, r.path.as_deref(), parent, what)
            .and_then(|(resolved, doc)| Ok((list_or_single::<T>(&resolved, doc)?, resolved)));
        match loaded {
            Ok((items, resolved)) => {
                out.extend(items.into_iter().map(|item| (resolved.clone(), item)));
            }
            Err(e) => errors.push(e),
        }
    }
    out
}

/// Keep the first item per identity key and record every later one.
///
/// Items with an empty key are dropped as missing their identity.
pub(crate) fn dedupe<T>(
    items: Vec<T>,
    what: &str,
    key: impl Fn(&T) -> String,
    file: impl Fn(&T) -> PathBuf,
    errors: &mut Vec<ParseError>,
) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        let k = key(&item);
        if k.is_empty() {
            errors.push(validation(
                ExErrorKind::MissingField,
                &file(&item),
                format!("{} without an identity", what),
            ));
        } else if !seen.insert(k.clone()) {
            errors.push(validation(
                ExErrorKind::DuplicateIdentity,
                &file(&item),
                format!("duplicate {}: {:?}", what, k),
            ));
        } else {
            kept.push(item);
        }
    }
    kept
}

/// Parse a platform list, recording and dropping unknown tags.
fn platform_set(raw: &str, file: &Path, owner: &str, errors: &mut Vec<ParseError>) -> PlatformSet {
    let mut set = PlatformSet::parse(raw);
    let invalid = set.invalid_tags().join(",");
    if !invalid.is_empty() {
        errors.push(validation(
            ExErrorKind::InvalidValue,
            file,
            format!("{:?}: invalid platform {:?}", owner, invalid),
        ));
        set.retain_valid();
    }
    set
}

pub(crate) fn policy_from_raw(file: PathBuf, raw: RawPolicy, errors: &mut Vec<ParseError>) -> Policy {
    let name = raw.name.trim().to_string();
    let platform = platform_set(&raw.platform, &file, &name, errors);
    Policy {
        name,
        query: raw.query,
        description: raw.description,
        resolution: raw.resolution,
        platform,
        critical: raw.critical,
        labels_include_any: raw.labels_include_any,
        labels_exclude_any: raw.labels_exclude_any,
        source_file: file,
    }
}

pub(crate) fn query_from_raw(file: PathBuf, raw: RawQuery, errors: &mut Vec<ParseError>) -> Query {
    let name = raw.name.trim().to_string();
    let platform = platform_set(&raw.platform, &file, &name, errors);
    let logging = match raw.logging.trim() {
        "" => None,
        value => match value.parse() {
            Ok(mode) => Some(mode),
            Err(msg) => {
                errors.push(validation(
                    ExErrorKind::InvalidValue,
                    &file,
                    format!("{:?}: {}", name, msg),
                ));
                None
            }
        },
    };
    Query {
        name,
        query: raw.query,
        interval: raw.interval,
        platform,
        logging,
        source_file: file,
    }
}

pub(crate) fn label_from_raw(file: PathBuf, raw: RawLabel, errors: &mut Vec<ParseError>) -> Label {
    let name = raw.name.trim().to_string();
    let platform = platform_set(&raw.platform, &file, &name, errors);
    let membership = match raw.label_membership_type.trim() {
        "" => None,
        value => match value.parse() {
            Ok(kind) => Some(kind),
            Err(msg) => {
                errors.push(validation(
                    ExErrorKind::InvalidValue,
                    &file,
                    format!("{:?}: {}", name, msg),
                ));
                None
            }
        },
    };
    Label {
        name,
        description: raw.description,
        query: raw.query,
        platform,
        membership,
        source_file: file,
    }
}

/// Load, convert and de-duplicate the policies behind `refs`.
pub(crate) fn load_policies(
    root: &RepoRoot,
    base_dir: &Path,
    refs: &[RawPathRef],
    parent: &Path,
    errors: &mut Vec<ParseError>,
) -> Vec<Policy> {
    let raw = load_documents::<RawPolicy>(root, base_dir, refs, parent, "", errors);
    let policies: Vec<Policy> = raw
        .into_iter()
        .map(|(file, p)| policy_from_raw(file, p, errors))
        .collect();
    dedupe(
        policies,
        "policy name",
        |p: &Policy| p.name.clone(),
        |p: &Policy| p.source_file.clone(),
        errors,
    )
}

/// Load, convert and de-duplicate the queries behind `refs`.
pub(crate) fn load_queries(
    root: &RepoRoot,
    base_dir: &Path,
    refs: &[RawPathRef],
    parent: &Path,
    errors: &mut Vec<ParseError>,
) -> Vec<Query> {
    let raw = load_documents::<RawQuery>(root, base_dir, refs, parent, "", errors);
    let queries: Vec<Query> = raw
        .into_iter()
        .map(|(file, q)| query_from_raw(file, q, errors))
        .collect();
    dedupe(
        queries,
        "query name",
        |q: &Query| q.name.clone(),
        |q: &Query| q.source_file.clone(),
        errors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_or_single_accepts_both_shapes() {
        let file = Path::new("p.yml");
        let list: Value = serde_yaml::from_str("- name: a\n- name: b\n").unwrap();
        let one: Value = serde_yaml::from_str("name: a\nquery: SELECT 1;\n").unwrap();

        assert_eq!(list_or_single::<RawPolicy>(file, list).unwrap().len(), 2);
        assert_eq!(list_or_single::<RawPolicy>(file, one).unwrap().len(), 1);
        assert!(list_or_single::<RawPolicy>(file, Value::from("text")).is_err());
    }

    #[test]
    fn test_dedupe_keeps_first_and_records_rest() {
        let mut errors = Vec::new();
        let kept = dedupe(
            vec!["a", "b", "a", ""],
            "thing",
            |s: &&str| s.to_string(),
            |_| PathBuf::from("f.yml"),
            &mut errors,
        );

        assert_eq!(kept, vec!["a", "b"]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ExErrorKind::DuplicateIdentity);
        assert_eq!(errors[1].kind, ExErrorKind::MissingField);
    }

    #[test]
    fn test_invalid_platform_tags_are_dropped() {
        let mut errors = Vec::new();
        let raw = RawPolicy {
            name: "p".to_string(),
            platform: "darwin,macos".to_string(),
            ..Default::default()
        };

        let policy = policy_from_raw(PathBuf::from("p.yml"), raw, &mut errors);

        assert_eq!(policy.platform, PlatformSet::parse("darwin"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ExErrorKind::InvalidValue);
    }

    #[test]
    fn test_invalid_logging_is_recorded() {
        let mut errors = Vec::new();
        let raw = RawQuery {
            name: "q".to_string(),
            logging: "sometimes".to_string(),
            ..Default::default()
        };

        let query = query_from_raw(PathBuf::from("q.yml"), raw, &mut errors);

        assert_eq!(query.logging, None);
        assert_eq!(errors.len(), 1);
    }
}
