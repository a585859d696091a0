//! CLI plan integration tests
//!
//! Run the built binary against a temporary repository and snapshot file.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "groups": [
    {
      "id": 7,
      "name": "Workstations",
      "policies": [
        {
          "id": 1,
          "name": "Firewall enabled",
          "query": "SELECT 1 FROM alf;",
          "platform": "darwin",
          "passing_host_count": 10,
          "failing_host_count": 2
        },
        {
          "id": 2,
          "name": "Legacy check",
          "query": "SELECT 1;",
          "passing_host_count": 3
        }
      ]
    }
  ]
}"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_test_repo(temp_dir: &TempDir) {
    let root = temp_dir.path();
    write(
        root,
        "teams/workstations.yml",
        "name: Workstations\npolicies:\n  - path: ../lib/policies.yml\n",
    );
    write(
        root,
        "lib/policies.yml",
        "- name: Firewall enabled\n  query: SELECT 1 FROM alf WHERE global_state >= 1;\n  platform: darwin\n",
    );
    write(root, "snapshot.json", SNAPSHOT);
}

fn run(temp_dir: &TempDir, extra: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_driftplan-cli");
    Command::new(cli_bin)
        .current_dir(temp_dir.path())
        .args(["plan", "--repo", ".", "--snapshot", "snapshot.json"])
        .args(extra)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_plan_markdown() {
    // Given a repository that modifies one policy and drops another
    let temp_dir = TempDir::new().unwrap();
    setup_test_repo(&temp_dir);

    // When
    let output = run(&temp_dir, &[]);

    // Then
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Workstations"), "stdout: {}", stdout);
    assert!(stdout.contains("Firewall enabled"));
    assert!(stdout.contains("Legacy check"));
}

#[test]
fn test_cli_plan_json() {
    let temp_dir = TempDir::new().unwrap();
    setup_test_repo(&temp_dir);

    let output = run(&temp_dir, &["--format", "json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_start().starts_with('['), "stdout: {}", stdout);
    assert!(stdout.contains("\"host_count\": 3"));
}

#[test]
fn test_cli_plan_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    setup_test_repo(&temp_dir);

    let output = run(&temp_dir, &["--output", "plan.md"]);

    assert!(output.status.success());
    let plan = fs::read_to_string(temp_dir.path().join("plan.md")).unwrap();
    assert!(plan.contains("Firewall enabled"));
}

#[test]
fn test_cli_plan_missing_teams_exits_with_error() {
    // Given a directory without a teams/ folder
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "snapshot.json", SNAPSHOT);

    // When
    let output = run(&temp_dir, &[]);

    // Then
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_REPO_STRUCTURE"), "stderr: {}", stderr);
}
