//! Repository loading
//!
//! [`load_repo`] is the loader entry point. Only a missing or unreadable
//! repository layout fails the call; every other problem is recorded on
//! [`ParsedRepo::errors`] and the affected file or entry is left out.

pub mod documents;
pub mod format;
pub mod global_file;
pub mod group_file;
pub mod paths;
pub mod profile_identity;
pub mod values;

use crate::errors::{repo_structure, validation};
use driftplan_core::errors::{ExError, ExErrorKind, ParseError};
use driftplan_core::model::ParsedRepo;
use paths::RepoRoot;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding one declaration file per group.
pub const GROUPS_DIR: &str = "teams";
/// Global declaration file, relative to the repository root.
pub const DEFAULT_GLOBAL_FILE: &str = "default.yml";

/// Where to load a repository from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub root: PathBuf,
    /// Global declaration file to use instead of `<root>/default.yml`.
    pub global_file: Option<PathBuf>,
}

impl LoadOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_file: None,
        }
    }

    pub fn with_global_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_file = Some(path.into());
        self
    }
}

/// Load the declaration repository described by `options`.
///
/// Group files are read in file-name order, so the first file declaring a
/// name wins and later ones are reported as duplicates.
///
/// # Errors
///
/// `ERR_REPO_STRUCTURE` if the root is not a directory or has no `teams/`
/// directory, or if the `teams/` directory cannot be listed.
pub fn load_repo(options: &LoadOptions) -> Result<ParsedRepo, ExError> {
    if !options.root.is_dir() {
        return Err(repo_structure(
            &options.root,
            "repository root is not a directory",
        ));
    }
    let root = RepoRoot::new(&options.root)
        .map_err(|e| repo_structure(&options.root, &e.to_string()))?;

    let groups_dir = root.path().join(GROUPS_DIR);
    if !groups_dir.is_dir() {
        return Err(repo_structure(&groups_dir, "teams/ directory not found"));
    }

    let mut repo = ParsedRepo::default();
    for file in group_files(&root, &groups_dir, &mut repo.errors)? {
        let Some(group) = group_file::parse_group_file(&root, &file, &mut repo.errors) else {
            continue;
        };
        if repo.group(&group.name).is_some() {
            repo.errors.push(validation(
                ExErrorKind::DuplicateIdentity,
                &file,
                format!("duplicate group name: {:?}", group.name),
            ));
            continue;
        }
        tracing::debug!(
            group = %group.name,
            policies = group.policies.len(),
            queries = group.queries.len(),
            profiles = group.profiles.len(),
            "group loaded"
        );
        repo.groups.push(group);
    }

    if let Some(file) = global_file(&root, options, &mut repo.errors) {
        if let Some(global) = global_file::parse_global_file(&root, &file, &mut repo.errors) {
            repo.labels = global.labels;
            repo.global = Some(global.scope);
        }
    }

    tracing::debug!(
        root = %root.path().display(),
        groups = repo.groups.len(),
        errors = repo.errors.len(),
        "repository loaded"
    );
    Ok(repo)
}

/// Group declaration files under `dir`, sorted by file name.
///
/// Entries that resolve outside the root are recorded and skipped.
fn group_files(
    root: &RepoRoot,
    dir: &Path,
    errors: &mut Vec<ParseError>,
) -> Result<Vec<PathBuf>, ExError> {
    let entries = fs::read_dir(dir).map_err(|e| repo_structure(dir, &e.to_string()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| repo_structure(dir, &e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yml") && !path.is_dir() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let name = name.to_string_lossy();
        match root.resolve(dir, &name) {
            Ok(real) => files.push(real),
            Err(e) => errors.push(e.into_parse_error(&dir.join(name.as_ref()))),
        }
    }
    Ok(files)
}

/// The global file to parse, if any.
///
/// A missing `default.yml` just means there is no global scope; a missing
/// explicit override is recorded.
fn global_file(
    root: &RepoRoot,
    options: &LoadOptions,
    errors: &mut Vec<ParseError>,
) -> Option<PathBuf> {
    match &options.global_file {
        Some(path) if path.is_file() => Some(path.clone()),
        Some(path) => {
            errors.push(ParseError::new(
                ExErrorKind::FileUnreadable,
                path,
                "global declaration file not found",
            ));
            None
        }
        None => {
            let path = root.path().join(DEFAULT_GLOBAL_FILE);
            path.is_file().then_some(path)
        }
    }
}
