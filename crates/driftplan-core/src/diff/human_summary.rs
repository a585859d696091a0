//! Markdown and JSON renderers for diff results.

use crate::diff::model::{ChangeKind, DiffResult, ResourceChange, ResourceDiff, Severity};
use crate::errors::ExError;

/// Render a Markdown summary of a full plan.
///
/// The summary is intended for review workflows and pull-request comments.
/// It is informational only and does not affect the structured diff.
pub fn render_markdown(results: &[DiffResult]) -> String {
    let mut out = String::new();

    out.push_str("## Drift Plan\n\n");

    if results.is_empty() {
        out.push_str("_No groups matched._\n");
        return out;
    }

    let (added, modified, deleted) = totals(results);
    out.push_str(&format!(
        "**Added**: {added}  \n**Modified**: {modified}  \n**Deleted**: {deleted}\n\n"
    ));

    for result in results {
        render_result(&mut out, result);
    }

    out
}

/// Render results as pretty-printed JSON.
///
/// # Errors
///
/// `Serialization` if serde_json rejects the value; this does not happen
/// for well-formed results.
pub fn render_json(results: &[DiffResult]) -> Result<String, ExError> {
    serde_json::to_string_pretty(results).map_err(|e| ExError::from(e).with_op("render_json"))
}

fn totals(results: &[DiffResult]) -> (usize, usize, usize) {
    let mut totals = (0, 0, 0);
    for result in results {
        for (_, bucket) in result.buckets() {
            totals.0 += bucket.added.len();
            totals.1 += bucket.modified.len();
            totals.2 += bucket.deleted.len();
        }
        for change in &result.config {
            match change.kind {
                ChangeKind::Added => totals.0 += 1,
                ChangeKind::Modified => totals.1 += 1,
            }
        }
    }
    totals
}

fn render_result(out: &mut String, result: &DiffResult) {
    out.push_str(&format!("### {}\n\n", result.group));

    for message in &result.messages {
        let marker = match message.severity {
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Error => "✖",
        };
        out.push_str(&format!("> {} {}\n", marker, message.text));
    }
    if !result.messages.is_empty() {
        out.push('\n');
    }

    if !result.has_changes() {
        out.push_str("_No changes._\n\n");
        return;
    }

    for (title, bucket) in result.buckets() {
        render_bucket(out, title, bucket);
    }

    if !result.config.is_empty() {
        out.push_str("#### Config\n\n");
        for change in &result.config {
            match (&change.kind, &change.old) {
                (ChangeKind::Modified, Some(old)) => out.push_str(&format!(
                    "- `{}.{}`: `{}` → `{}`\n",
                    change.section, change.key, old, change.new
                )),
                _ => out.push_str(&format!(
                    "- `{}.{}`: + `{}`\n",
                    change.section, change.key, change.new
                )),
            }
        }
        out.push('\n');
    }

    if !result.labels.is_empty() {
        out.push_str("#### Labels\n\n");
        for label in &result.labels.valid {
            out.push_str(&format!(
                "- ✓ `{}` ({} hosts, referenced by {})\n",
                label.name,
                label.host_count.unwrap_or_default(),
                label.referenced_by
            ));
        }
        for label in &result.labels.missing {
            out.push_str(&format!(
                "- ✗ `{}` **missing** (referenced by {})\n",
                label.name, label.referenced_by
            ));
        }
        out.push('\n');
    }
}

fn render_bucket(out: &mut String, title: &str, bucket: &ResourceDiff) {
    if bucket.is_empty() {
        return;
    }
    out.push_str(&format!("#### {} ({})\n\n", title, bucket.total()));
    for change in &bucket.added {
        out.push_str(&format!("- **+** {}\n", change.name));
    }
    for change in &bucket.modified {
        out.push_str(&format!("- **~** {}{}\n", change.name, hosts_suffix(change)));
        for (field, diff) in &change.fields {
            out.push_str(&format!(
                "  - {}: `{}` → `{}`\n",
                field,
                diff.old.as_deref().unwrap_or_default(),
                diff.new.as_deref().unwrap_or_default()
            ));
        }
    }
    for change in &bucket.deleted {
        out.push_str(&format!("- **-** {}{}\n", change.name, hosts_suffix(change)));
        if let Some(warning) = &change.warning {
            out.push_str(&format!("  - ⚠ {}\n", warning));
        }
    }
    out.push('\n');
}

fn hosts_suffix(change: &ResourceChange) -> String {
    match change.host_count {
        Some(n) => format!(" ({} hosts)", n),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{ConfigChange, DiffMessage, FieldDiff, LabelRef};

    fn changed_result() -> DiffResult {
        let mut result = DiffResult::new("Workstations");
        result.policies.added.push(ResourceChange::named("Disk encryption"));
        result.policies.modified.push(
            ResourceChange::named("Firewall")
                .with_field("critical", FieldDiff::changed("false", "true")),
        );
        result.policies.deleted.push(ResourceChange {
            name: "Legacy".to_string(),
            host_count: Some(42),
            warning: Some("will delete policy affecting 42 hosts".to_string()),
            ..Default::default()
        });
        result.labels.missing.push(LabelRef {
            name: "Servers".to_string(),
            host_count: None,
            referenced_by: "Firewall".to_string(),
        });
        result
    }

    #[test]
    fn test_summary_empty_plan() {
        let s = render_markdown(&[]);
        assert!(s.contains("_No groups matched._"));
    }

    #[test]
    fn test_summary_no_changes() {
        let s = render_markdown(&[DiffResult::new("Servers")]);
        assert!(s.contains("### Servers"));
        assert!(s.contains("_No changes._"));
    }

    #[test]
    fn test_summary_buckets_and_labels() {
        let s = render_markdown(&[changed_result()]);

        assert!(s.contains("**Added**: 1"));
        assert!(s.contains("**Deleted**: 1"));
        assert!(s.contains("#### Policies (3)"));
        assert!(s.contains("- **+** Disk encryption"));
        assert!(s.contains("  - critical: `false` → `true`"));
        assert!(s.contains("- **-** Legacy (42 hosts)"));
        assert!(s.contains("will delete policy affecting 42 hosts"));
        assert!(s.contains("`Servers` **missing**"));
    }

    #[test]
    fn test_summary_config_and_messages() {
        let mut result = DiffResult::new("(global)");
        result.config.push(ConfigChange {
            section: "org_settings".to_string(),
            key: "features.enable_host_users".to_string(),
            old: Some("true".to_string()),
            new: "false".to_string(),
            kind: ChangeKind::Modified,
        });
        result
            .messages
            .push(DiffMessage::new(Severity::Warning, "duplicate profile name"));

        let s = render_markdown(&[result]);

        assert!(s.contains("#### Config"));
        assert!(s.contains("`org_settings.features.enable_host_users`: `true` → `false`"));
        assert!(s.contains("> ⚠ duplicate profile name"));
    }

    #[test]
    fn test_json_output_is_deterministic() {
        let results = vec![changed_result()];
        let a = render_json(&results).unwrap();
        let b = render_json(&results).unwrap();
        assert_eq!(a, b);
        let parsed: Vec<DiffResult> = serde_json::from_str(&a).unwrap();
        assert_eq!(parsed, results);
    }
}
