//! Text summary builder for CLI output.
//!
//! This module formats human-readable lines for text mode.

use crate::findings::{format_age, RunView};
use crate::model::Run;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String], empty: &str) {
    lines.push(String::new());
    lines.push(format!("{title}:"));
    if items.is_empty() {
        lines.push(format!("  {empty}"));
    } else {
        lines.extend(items.iter().map(|i| format!("  - {i}")));
    }
}

/// Build the findings report for one run.
pub(crate) fn build_text_summary(view: &RunView) -> TextSummary {
    let mut lines = vec![
        format!("Run: {}", view.label),
        format!("Run folder: {}", view.path.display()),
        format!("Timestamp: {}", view.timestamp.as_deref().unwrap_or("—")),
        format!("Modified: {}", view.modified),
    ];

    let kpis = view
        .findings
        .kpis()
        .iter()
        .map(|(label, n)| format!("{label}: {n}"))
        .collect::<Vec<_>>()
        .join("   ");
    lines.push(kpis);

    let f = &view.findings;
    push_section(&mut lines, "Links", &f.mainstream, "No links found.");
    push_section(&mut lines, "Emails", &f.emails, "No emails found.");
    push_section(&mut lines, "Phones", &f.phones, "No phones found.");
    push_section(&mut lines, "Avatars", &f.avatars, "No avatars found.");

    TextSummary { lines }
}

/// Numbered run picker listing, newest = 1.
pub(crate) fn build_run_list(runs: &[Run], labels: &[String]) -> TextSummary {
    let lines = runs
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(i, (run, label))| {
            format!(
                "{:>3}. {}  ({}, modified {})",
                i + 1,
                label,
                run.path.display(),
                format_age(run.modified)
            )
        })
        .collect();
    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Summary;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn run(path: &str, target: &str) -> Run {
        Run {
            path: PathBuf::from(path),
            target_dir: target.into(),
            modified: SystemTime::now(),
        }
    }

    #[test]
    fn test_summary_dedupes_and_counts() {
        let s: Summary = serde_json::from_str(
            r#"{"timestamp":"2024-05-01","emails":["a@x.com","a@x.com","b@y.com"],"mainstream":["https://gh/a"]}"#,
        )
        .unwrap();
        let view = RunView::from_parts(&run("/r/alice", "alice"), Some(s));
        let out = build_text_summary(&view).lines;

        assert_eq!(out[0], "Run: alice — 2024-05-01");
        assert!(out.contains(&"Mainstream URLs: 1   Emails: 2   Phones: 0   Avatars: 0".to_string()));
        assert_eq!(out.iter().filter(|l| l.contains("a@x.com")).count(), 1);
        assert!(out.contains(&"  No phones found.".to_string()));
    }

    #[test]
    fn test_summary_without_data() {
        let view = RunView::from_parts(&run("/r/bob", "bob"), None);
        let out = build_text_summary(&view).lines;
        assert!(out.contains(&"Timestamp: —".to_string()));
        assert!(out.contains(&"  No links found.".to_string()));
    }

    #[test]
    fn test_run_list_numbering() {
        let runs = vec![run("/r/a", "a"), run("/r/b", "b")];
        let labels = vec!["a — x".to_string(), "b — y".to_string()];
        let out = build_run_list(&runs, &labels).lines;
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("  1. a — x  (/r/a, modified"));
        assert!(out[1].starts_with("  2. b — y"));
    }
}
