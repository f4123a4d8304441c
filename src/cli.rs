use crate::findings::RunView;
use crate::model::{AppConfig, ScanConfig, ScanResult};
use crate::orchestrator;
use crate::pipeline::PipelineInvoker;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "osint-dash",
    version,
    about = "Run an external OSINT pipeline and browse its results"
)]
pub struct Cli {
    /// Target username or name to scan
    #[arg(long)]
    pub target: Option<String>,

    /// Print JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text report and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Run silently: suppress all output except errors (for cron usage)
    #[arg(long)]
    pub silent: bool,

    /// List runs instead of showing one (text/JSON modes)
    #[arg(long)]
    pub list: bool,

    /// Run to show in text/JSON modes, 1 = most recent [default: the scanned run, else 1]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub run: Option<u32>,

    /// Only show runs whose target name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Path to the pipeline script
    #[arg(long, env = "OSINT_PIPELINE", default_value = "./osint-master.sh")]
    pub pipeline: PathBuf,

    /// Results base folder [default: ~/osint_results]
    #[arg(long, env = "OSINT_RESULTS_BASE")]
    pub results_base: Option<PathBuf>,

    /// Deep scan. Use --deep true or --deep false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub deep: bool,

    /// Include X/Twitter
    #[arg(long)]
    pub include_x: bool,

    /// Compact mode. Use --compact true or --compact false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub compact: bool,

    /// Single folder per target (overwrite). With false, keep dated runs and prune to --keep
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub single_folder: bool,

    /// Keep latest N runs per target when not in single-folder mode
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub keep: u16,

    /// Number of result pages the pipeline should open when done
    #[arg(long, default_value_t = 0)]
    pub top_open: u32,

    /// Ask the pipeline for a fast, shallower pass
    #[arg(long)]
    pub fast: bool,

    /// Start the scan for --target when the dashboard opens
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub scan_on_launch: bool,

    /// Export the shown run's findings as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Write logs to this file (the TUI never logs to the terminal)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Text, JSON and silent modes run once and exit.
    pub fn is_batch(&self) -> bool {
        self.silent || self.json || self.text
    }
}

pub async fn run(args: Cli) -> Result<()> {
    // Validate that --silent can only be used with --json
    if args.silent && !args.json {
        return Err(anyhow::anyhow!(
            "--silent can only be used with --json. Use --silent --json together."
        ));
    }

    let cfg = build_config(&args);
    crate::storage::ensure_results_base(&cfg.scan.results_base)?;

    if !args.is_batch() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, cfg).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_batch(args, cfg, false).await;
        }
    }

    let silent = args.silent;
    run_batch(args, cfg, silent).await
}

/// Build the session configuration from CLI arguments.
pub fn build_config(args: &Cli) -> AppConfig {
    let results_base = args
        .results_base
        .clone()
        .unwrap_or_else(crate::storage::default_results_base);
    AppConfig {
        pipeline: crate::pipeline::resolve_script(&args.pipeline),
        scan: ScanConfig {
            results_base,
            deep: args.deep,
            include_x: args.include_x,
            compact: args.compact,
            single_folder: args.single_folder,
            top_open: args.top_open,
            fast: args.fast,
        },
        keep: usize::from(args.keep),
        filter: args.filter.clone(),
    }
}

#[derive(Serialize)]
struct RunListEntry<'a> {
    index: usize,
    label: &'a str,
    path: &'a std::path::Path,
    modified: String,
}

/// Run once without a TUI: optional scan, then list or show runs.
async fn run_batch(args: Cli, cfg: AppConfig, silent: bool) -> Result<()> {
    let (out_tx, out_handle) = if silent {
        (None, None)
    } else {
        let (tx, handle) = spawn_output_writer();
        (Some(tx), Some(handle))
    };
    let say = |line: OutputLine| {
        if let Some(tx) = out_tx.as_ref() {
            let _ = tx.send(line);
        }
    };

    let mut loaded = orchestrator::load_runs(&cfg);
    if !loaded.pruned.removed.is_empty() {
        say(OutputLine::Stderr(format!(
            "Pruned {} old run(s)",
            loaded.pruned.removed.len()
        )));
    }

    let mut selected = args.run.map(|n| (n as usize).saturating_sub(1));
    if let Some(target) = args.target.as_deref() {
        let invoker = PipelineInvoker::new(&cfg.pipeline);
        say(OutputLine::Stderr(format!("Running pipeline for {}…", target.trim())));
        let output = invoker
            .run(target, &cfg.scan)
            .await
            .context("scan failed")?;
        if !output.stdout.trim().is_empty() {
            say(OutputLine::Stderr("Pipeline output:".into()));
            for line in output.stdout.trim().lines() {
                say(OutputLine::Stderr(format!("  {line}")));
            }
        }
        let processed = orchestrator::process_scan_completion(
            &cfg,
            target.trim(),
            &ScanResult::Succeeded(output),
        );
        say(OutputLine::Stderr(processed.message.clone()));
        // Without an explicit --run, show the run the scan just produced.
        if selected.is_none() {
            selected = processed.select;
        }
        loaded = processed.loaded;
    }

    if args.list {
        if args.json {
            let entries: Vec<RunListEntry> = loaded
                .runs
                .iter()
                .zip(&loaded.labels)
                .enumerate()
                .map(|(i, (r, label))| RunListEntry {
                    index: i + 1,
                    label,
                    path: &r.path,
                    modified: crate::findings::format_modified(r.modified),
                })
                .collect();
            say(OutputLine::Stdout(serde_json::to_string_pretty(&entries)?));
        } else if loaded.runs.is_empty() {
            say(OutputLine::Stdout("No runs found.".into()));
        } else {
            let list = crate::text_summary::build_run_list(&loaded.runs, &loaded.labels);
            for line in list.lines {
                say(OutputLine::Stdout(line));
            }
        }
    } else if loaded.runs.is_empty() {
        if args.json {
            say(OutputLine::Stdout("null".into()));
        } else {
            say(OutputLine::Stdout(
                "No runs found. Run a scan with --target <name>.".into(),
            ));
        }
    } else {
        let selected = selected.unwrap_or(0);
        let run = loaded.runs.get(selected).ok_or_else(|| {
            anyhow::anyhow!(
                "run {} does not exist ({} run(s) available)",
                selected + 1,
                loaded.runs.len()
            )
        })?;
        let view = RunView::load(run);

        if let Some(p) = args.export_json.as_deref() {
            crate::storage::export_json(p, &view)?;
            say(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
        }

        if args.json {
            say(OutputLine::Stdout(serde_json::to_string_pretty(&view)?));
        } else {
            for line in crate::text_summary::build_text_summary(&view).lines {
                say(OutputLine::Stdout(line));
            }
        }
    }

    if let Some(tx) = out_tx {
        drop(tx);
    }
    if let Some(handle) = out_handle {
        let _ = handle.await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Cli::try_parse_from(["osint-dash", "--results-base", "/tmp/r"]).unwrap();
        let cfg = build_config(&args);
        assert!(cfg.scan.deep);
        assert!(!cfg.scan.include_x);
        assert!(cfg.scan.compact);
        assert!(cfg.scan.single_folder);
        assert!(!cfg.scan.fast);
        assert_eq!(cfg.scan.top_open, 0);
        assert_eq!(cfg.keep, 5);
        assert_eq!(cfg.scan.results_base, PathBuf::from("/tmp/r"));
        assert!(cfg.pipeline.is_absolute());
        assert!(cfg.pipeline.ends_with("osint-master.sh"));
        assert!(!args.is_batch());
    }

    #[test]
    fn test_flag_overrides() {
        let args = Cli::try_parse_from([
            "osint-dash",
            "--deep",
            "false",
            "--single-folder",
            "false",
            "--include-x",
            "--keep",
            "7",
            "--text",
        ])
        .unwrap();
        let cfg = build_config(&args);
        assert!(!cfg.scan.deep);
        assert!(!cfg.scan.single_folder);
        assert!(cfg.scan.include_x);
        assert_eq!(cfg.keep, 7);
        assert!(cfg.retention_enabled());
        assert!(args.is_batch());
    }

    #[test]
    fn test_keep_range() {
        assert!(Cli::try_parse_from(["osint-dash", "--keep", "0"]).is_err());
        assert!(Cli::try_parse_from(["osint-dash", "--keep", "101"]).is_err());
        assert!(Cli::try_parse_from(["osint-dash", "--keep", "100"]).is_ok());
    }

    #[test]
    fn test_run_index_starts_at_one() {
        assert!(Cli::try_parse_from(["osint-dash", "--run", "0"]).is_err());
        let args = Cli::try_parse_from(["osint-dash"]).unwrap();
        assert_eq!(args.run, None);
        let args = Cli::try_parse_from(["osint-dash", "--run", "1"]).unwrap();
        assert_eq!(args.run, Some(1));
    }

    #[tokio::test]
    async fn test_silent_requires_json() {
        let args = Cli::try_parse_from(["osint-dash", "--silent"]).unwrap();
        let err = run(args).await.unwrap_err();
        assert!(err.to_string().contains("--silent"));
    }
}
