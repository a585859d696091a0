use driftplan_core::errors::{ExErrorKind, ParseError};
use driftplan_core::model::ParsedRepo;
use driftplan_loader::{load_repo, LoadOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A declaration repository laid out in a temporary directory.
pub struct RepoFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl RepoFixture {
    /// An empty repository with a `teams/` directory.
    pub fn new() -> Self {
        let fixture = Self::bare();
        fs::create_dir_all(fixture.root().join("teams")).unwrap();
        fixture
    }

    /// An empty repository without any layout.
    pub fn bare() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn load(&self) -> ParsedRepo {
        load_repo(&LoadOptions::new(self.root())).unwrap()
    }
}

/// Errors of one kind, in recorded order.
#[allow(dead_code)]
pub fn errors_of(repo: &ParsedRepo, kind: ExErrorKind) -> Vec<&ParseError> {
    repo.errors.iter().filter(|e| e.kind == kind).collect()
}

/// A macOS profile with the given top-level display name.
#[allow(dead_code)]
pub fn mobileconfig(display_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>PayloadContent</key>
  <array>
    <dict>
      <key>PayloadDisplayName</key>
      <string>Nested payload</string>
    </dict>
  </array>
  <key>PayloadDisplayName</key>
  <string>{}</string>
  <key>PayloadType</key>
  <string>Configuration</string>
</dict>
</plist>
"#,
        display_name
    )
}
