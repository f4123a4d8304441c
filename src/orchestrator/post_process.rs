//! Dashboard loads and post-scan processing.
//!
//! Handles retention, run discovery and label building after a scan completes or
//! whenever the dashboard reloads storage.

use crate::findings::run_label;
use crate::model::{AppConfig, Run, ScanResult};
use crate::storage::{self, PruneReport};

/// Fresh view of the run store, ready for presentation layers.
pub(crate) struct LoadedRuns {
    pub runs: Vec<Run>,
    pub labels: Vec<String>,
    pub pruned: PruneReport,
}

/// Re-read storage from scratch, pruning first when retention is enabled.
pub(crate) fn load_runs(cfg: &AppConfig) -> LoadedRuns {
    let base = &cfg.scan.results_base;
    let pruned = if cfg.retention_enabled() {
        storage::prune_all(base, cfg.keep)
    } else {
        PruneReport::default()
    };

    let runs = storage::list_runs(base, cfg.filter.as_deref());
    let labels = runs
        .iter()
        .map(|r| run_label(r, storage::load_summary(&r.path).as_ref()))
        .collect();

    LoadedRuns {
        runs,
        labels,
        pruned,
    }
}

/// Result of post-scan processing.
pub(crate) struct ProcessedScan {
    pub loaded: LoadedRuns,
    pub message: String,
    /// Pipeline stdout on success, failure detail otherwise.
    pub output: Option<String>,
    /// Index of the newest run for the scanned target, if one exists.
    pub select: Option<usize>,
}

pub(crate) fn process_scan_completion(
    cfg: &AppConfig,
    target: &str,
    result: &ScanResult,
) -> ProcessedScan {
    let loaded = load_runs(cfg);
    let (message, output) = match result {
        ScanResult::Succeeded(out) => {
            let stdout = out.stdout.trim();
            (
                format!("Done: {target}"),
                (!stdout.is_empty()).then(|| stdout.to_string()),
            )
        }
        ScanResult::Failed(detail) => (
            "Pipeline failed.".to_string(),
            Some(detail.trim().to_string()),
        ),
    };

    let select = match result {
        ScanResult::Succeeded(_) => {
            let needle = target.to_lowercase();
            loaded
                .runs
                .iter()
                .position(|r| r.target_dir.to_lowercase() == needle)
                .or_else(|| (!loaded.runs.is_empty()).then_some(0))
        }
        ScanResult::Failed(_) => None,
    };

    ProcessedScan {
        loaded,
        message,
        output,
        select,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PipelineOutput, ScanConfig};
    use crate::storage::test_support::make_run;
    use std::path::Path;
    use tempfile::TempDir;

    fn cfg(base: &Path, single_folder: bool, keep: usize) -> AppConfig {
        AppConfig {
            pipeline: base.join("pipeline.sh"),
            scan: ScanConfig {
                results_base: base.to_path_buf(),
                single_folder,
                ..Default::default()
            },
            keep,
            filter: None,
        }
    }

    #[test]
    fn test_load_runs_prunes_only_in_multi_run_mode() {
        let dir = TempDir::new().unwrap();
        for i in 0..4 {
            make_run(&dir.path().join("alice").join(format!("r{i}")), "{}", 1_000 + i);
        }

        let single = load_runs(&cfg(dir.path(), true, 2));
        assert_eq!(single.runs.len(), 4);
        assert!(single.pruned.is_empty());

        let multi = load_runs(&cfg(dir.path(), false, 2));
        assert_eq!(multi.runs.len(), 2);
        assert_eq!(multi.pruned.removed.len(), 2);
        assert_eq!(multi.labels, vec!["alice — r3", "alice — r2"]);
    }

    #[test]
    fn test_load_runs_empty_base() {
        let dir = TempDir::new().unwrap();
        let loaded = load_runs(&cfg(&dir.path().join("missing"), false, 5));
        assert!(loaded.runs.is_empty());
        assert!(loaded.labels.is_empty());
    }

    #[test]
    fn test_success_selects_scanned_target() {
        let dir = TempDir::new().unwrap();
        make_run(&dir.path().join("bob"), "{}", 9_000);
        make_run(&dir.path().join("alice"), r#"{"target":"alice"}"#, 1_000);

        let processed = process_scan_completion(
            &cfg(dir.path(), true, 5),
            "Alice",
            &ScanResult::Succeeded(PipelineOutput {
                code: 0,
                stdout: "  found 3 profiles\n".into(),
                stderr: String::new(),
            }),
        );
        assert_eq!(processed.select, Some(1));
        assert_eq!(processed.message, "Done: Alice");
        assert_eq!(processed.output.as_deref(), Some("found 3 profiles"));
    }

    #[test]
    fn test_failure_carries_detail() {
        let dir = TempDir::new().unwrap();
        let processed = process_scan_completion(
            &cfg(dir.path(), true, 5),
            "alice",
            &ScanResult::Failed("Pipeline failed (exit 1): boom\n".into()),
        );
        assert_eq!(processed.message, "Pipeline failed.");
        assert_eq!(
            processed.output.as_deref(),
            Some("Pipeline failed (exit 1): boom")
        );
        assert!(processed.select.is_none());
    }
}
