//! Aggregated view of a run's summary: deduplicated lists, KPI counts and labels.

use crate::model::{Run, Summary};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Remove duplicates while keeping the first occurrence of each value in place.
pub fn dedupe(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}

/// Deduplicated findings of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub mainstream: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub avatars: Vec<String>,
}

impl Findings {
    /// A missing summary renders exactly like an empty one.
    pub fn from_summary(summary: Option<&Summary>) -> Self {
        match summary {
            Some(s) => Self {
                mainstream: dedupe(&s.mainstream),
                emails: dedupe(&s.emails),
                phones: dedupe(&s.phones),
                avatars: dedupe(&s.avatars),
            },
            None => Self::default(),
        }
    }

    /// KPI cards in display order.
    pub fn kpis(&self) -> [(&'static str, usize); 4] {
        [
            ("Mainstream URLs", self.mainstream.len()),
            ("Emails", self.emails.len()),
            ("Phones", self.phones.len()),
            ("Avatars", self.avatars.len()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.mainstream.is_empty()
            && self.emails.is_empty()
            && self.phones.is_empty()
            && self.avatars.is_empty()
    }
}

/// Picker label: `"<target> — <timestamp or folder name>"`.
pub fn run_label(run: &Run, summary: Option<&Summary>) -> String {
    let target = summary
        .and_then(|s| s.target.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or(run.target_dir.as_str());
    let when = summary
        .and_then(|s| s.timestamp.as_deref())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| run.folder_name());
    format!("{target} — {when}")
}

/// A loaded run with everything the presentation layers need.
#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub path: PathBuf,
    pub label: String,
    pub target: String,
    pub timestamp: Option<String>,
    pub modified: String,
    pub findings: Findings,
    #[serde(skip)]
    pub summary: Option<Summary>,
}

impl RunView {
    pub fn load(run: &Run) -> Self {
        let summary = crate::storage::load_summary(&run.path);
        Self::from_parts(run, summary)
    }

    pub fn from_parts(run: &Run, summary: Option<Summary>) -> Self {
        let label = run_label(run, summary.as_ref());
        let target = summary
            .as_ref()
            .and_then(|s| s.target.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| run.target_dir.clone());
        Self {
            path: run.path.clone(),
            label,
            target,
            timestamp: summary.as_ref().and_then(|s| s.timestamp.clone()),
            modified: format_modified(run.modified),
            findings: Findings::from_summary(summary.as_ref()),
            summary,
        }
    }

    /// Raw summary as pretty JSON, `{}` when absent.
    pub fn raw_json(&self) -> String {
        self.summary
            .as_ref()
            .and_then(|s| serde_json::to_string_pretty(s).ok())
            .unwrap_or_else(|| "{}".to_string())
    }
}

/// Render a modification time in local time, falling back to UTC.
pub fn format_modified(t: std::time::SystemTime) -> String {
    let fmt = time::macros::format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
    );
    let utc = time::OffsetDateTime::from(t);
    let dt = match time::UtcOffset::current_local_offset() {
        Ok(off) => utc.to_offset(off),
        Err(_) => utc,
    };
    dt.format(&fmt).unwrap_or_else(|_| "-".to_string())
}

/// Rough age such as `"3h 12m ago"`, second precision dropped.
pub fn format_age(t: std::time::SystemTime) -> String {
    match std::time::SystemTime::now().duration_since(t) {
        Ok(d) => {
            let secs = d.as_secs();
            let rounded = if secs >= 60 { secs - secs % 60 } else { secs };
            format!(
                "{} ago",
                humantime::format_duration(std::time::Duration::from_secs(rounded))
            )
        }
        Err(_) => "just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn run(path: &str, target_dir: &str) -> Run {
        Run {
            path: PathBuf::from(path),
            target_dir: target_dir.to_string(),
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        }
    }

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        assert_eq!(
            dedupe(&strings(&["a", "b", "a", "c"])),
            strings(&["a", "b", "c"])
        );
        assert!(dedupe(&[]).is_empty());
        assert_eq!(dedupe(&strings(&["x", "x", "x"])), strings(&["x"]));
    }

    #[test]
    fn test_email_kpi_counts_unique() {
        let s: Summary =
            serde_json::from_str(r#"{"emails": ["a@x.com","a@x.com","b@y.com"]}"#).unwrap();
        let f = Findings::from_summary(Some(&s));
        assert_eq!(f.emails, strings(&["a@x.com", "b@y.com"]));
        assert_eq!(f.kpis()[1], ("Emails", 2));
    }

    #[test]
    fn test_absent_and_empty_summary_render_identically() {
        let empty = Summary::default();
        assert_eq!(
            Findings::from_summary(None),
            Findings::from_summary(Some(&empty))
        );
        assert!(Findings::from_summary(None).is_empty());
    }

    #[test]
    fn test_label_prefers_summary_fields() {
        let r = run("/base/alice/20240101", "alice");
        let s = Summary {
            target: Some("Alice".into()),
            timestamp: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        };
        assert_eq!(run_label(&r, Some(&s)), "Alice — 2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_label_falls_back_to_directories() {
        let r = run("/base/alice/20240101", "alice");
        assert_eq!(run_label(&r, None), "alice — 20240101");

        let single = run("/base/bob", "bob");
        let s = Summary {
            timestamp: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(run_label(&single, Some(&s)), "bob — bob");
    }

    #[test]
    fn test_run_view_without_summary() {
        let view = RunView::from_parts(&run("/base/carol", "carol"), None);
        assert_eq!(view.target, "carol");
        assert!(view.timestamp.is_none());
        assert!(view.findings.is_empty());
        assert_eq!(view.raw_json(), "{}");
    }

    #[test]
    fn test_run_view_serializes_findings() {
        let s = Summary {
            mainstream: strings(&["https://a", "https://a", "https://b"]),
            ..Default::default()
        };
        let view = RunView::from_parts(&run("/base/dan", "dan"), Some(s));
        let v = serde_json::to_value(&view).unwrap();
        assert_eq!(v["findings"]["mainstream"].as_array().unwrap().len(), 2);
        assert!(v.get("summary").is_none());
    }

    #[test]
    fn test_format_age() {
        let t = SystemTime::now() - Duration::from_secs(3 * 3600 + 125);
        assert_eq!(format_age(t), "3h 2m ago");
        let future = SystemTime::now() + Duration::from_secs(60);
        assert_eq!(format_age(future), "just now");
    }
}
