//! Run store access: discovery, summary loading, retention and exports.
//!
//! The results base is owned by the external pipeline. This module only reads it,
//! except for retention pruning and explicit deletes.

use crate::model::{Run, Summary, SUMMARY_REL_PATH};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Default results location: `~/osint_results`, or a relative folder when no home exists.
pub fn default_results_base() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join("osint_results"))
        .unwrap_or_else(|| PathBuf::from("osint_results"))
}

/// Create the results base if it does not exist yet.
pub fn ensure_results_base(base: &Path) -> Result<()> {
    fs::create_dir_all(base)
        .with_context(|| format!("create results base {}", base.display()))
}

pub fn summary_path(run_dir: &Path) -> PathBuf {
    let mut p = run_dir.to_path_buf();
    for part in SUMMARY_REL_PATH {
        p.push(part);
    }
    p
}

fn has_summary(dir: &Path) -> bool {
    summary_path(dir).is_file()
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Immediate subdirectories of `dir`, sorted by name. Unreadable entries are skipped.
fn child_dirs(dir: &Path) -> Vec<PathBuf> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!(path = %dir.display(), error = %e, "cannot read directory");
            return Vec::new();
        }
    };
    let mut out: Vec<PathBuf> = rd
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    out.sort();
    out
}

/// Runs belonging to one target directory: the directory itself when it holds a
/// summary (single-folder layout), otherwise each child that holds one.
fn runs_in_target(target_dir: &Path, out: &mut Vec<Run>) {
    let target_name = target_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if has_summary(target_dir) {
        out.push(Run {
            path: target_dir.to_path_buf(),
            target_dir: target_name,
            modified: modified(target_dir),
        });
        return;
    }

    for sub in child_dirs(target_dir) {
        if has_summary(&sub) {
            out.push(Run {
                modified: modified(&sub),
                path: sub,
                target_dir: target_name.clone(),
            });
        }
    }
}

fn sort_most_recent_first(runs: &mut [Run]) {
    runs.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// List every run under `base`, newest first.
///
/// `filter` is a case-insensitive substring match on the target directory name.
/// A missing base yields an empty list.
pub fn list_runs(base: &Path, filter: Option<&str>) -> Vec<Run> {
    let needle = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);

    let mut runs = Vec::new();
    for target_dir in child_dirs(base) {
        if let Some(needle) = needle.as_deref() {
            let name = target_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !name.contains(needle) {
                continue;
            }
        }
        runs_in_target(&target_dir, &mut runs);
    }
    sort_most_recent_first(&mut runs);
    runs
}

/// List the runs of exactly one target, newest first.
pub fn list_target_runs(base: &Path, target: &str) -> Vec<Run> {
    let dir = base.join(target);
    let mut runs = Vec::new();
    if dir.is_dir() {
        runs_in_target(&dir, &mut runs);
    }
    sort_most_recent_first(&mut runs);
    runs
}

/// Load `data/summary.json` from a run directory.
///
/// Missing or unparsable files yield `None`; a run may still be in the middle of
/// being written by the pipeline.
pub fn load_summary(run_dir: &Path) -> Option<Summary> {
    let path = summary_path(run_dir);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(_) => return None,
    };
    match serde_json::from_str::<Summary>(&text) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring unparsable summary");
            None
        }
    }
}

/// Paths touched by a retention pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl PruneReport {
    fn merge(&mut self, other: PruneReport) {
        self.removed.extend(other.removed);
        self.failed.extend(other.failed);
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Keep the `keep` most recent runs of `target`, deleting the rest.
///
/// Deletion is best-effort: a failure is recorded and the remaining entries are
/// still processed.
pub fn prune_target(base: &Path, target: &str, keep: usize) -> PruneReport {
    let mut report = PruneReport::default();
    let runs = list_target_runs(base, target);
    if runs.len() <= keep {
        return report;
    }
    for old in &runs[keep..] {
        match fs::remove_dir_all(&old.path) {
            Ok(()) => {
                tracing::info!(path = %old.path.display(), "pruned old run");
                report.removed.push(old.path.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %old.path.display(), "run already removed");
            }
            Err(e) => {
                tracing::warn!(path = %old.path.display(), error = %e, "failed to prune run");
                report.failed.push(old.path.clone());
            }
        }
    }
    report
}

/// Apply [`prune_target`] to every target directory under `base`.
pub fn prune_all(base: &Path, keep: usize) -> PruneReport {
    let mut report = PruneReport::default();
    for target_dir in child_dirs(base) {
        if let Some(name) = target_dir.file_name().and_then(|n| n.to_str()) {
            report.merge(prune_target(base, name, keep));
        }
    }
    report
}

/// Delete a single run directory.
pub fn delete_run(run: &Run) -> Result<()> {
    fs::remove_dir_all(&run.path)
        .with_context(|| format!("delete run {}", run.path.display()))?;
    tracing::info!(path = %run.path.display(), "deleted run");
    Ok(())
}

pub fn export_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create export dir {}", parent.display()))?;
        }
    }
    let out = serde_json::to_string_pretty(value).context("serialize export")?;
    fs::write(path, out).with_context(|| format!("write export {}", path.display()))?;
    Ok(())
}
