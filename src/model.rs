use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::SystemTime;

/// Relative location of the summary file inside a run directory.
pub const SUMMARY_REL_PATH: [&str; 2] = ["data", "summary.json"];

/// Options for a single pipeline invocation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub results_base: PathBuf,
    pub deep: bool,
    pub include_x: bool,
    pub compact: bool,
    pub single_folder: bool,
    pub top_open: u32,
    pub fast: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            results_base: PathBuf::from("osint_results"),
            deep: true,
            include_x: false,
            compact: true,
            single_folder: true,
            top_open: 0,
            fast: false,
        }
    }
}

/// Session-wide settings threaded through the controller and storage calls.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PathBuf,
    pub scan: ScanConfig,
    /// Retention count used when `scan.single_folder` is off.
    pub keep: usize,
    pub filter: Option<String>,
}

impl AppConfig {
    /// Whether per-target retention applies (multi-run storage mode).
    pub fn retention_enabled(&self) -> bool {
        !self.scan.single_folder
    }
}

/// One run directory discovered under the results base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub path: PathBuf,
    /// Name of the target directory this run belongs to.
    pub target_dir: String,
    pub modified: SystemTime,
}

impl Run {
    /// Final path component, i.e. the target name or the dated subfolder.
    pub fn folder_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Parsed `data/summary.json`. Every field is optional.
///
/// Field values of the wrong type are dropped individually so one bad field
/// does not hide the rest of the summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub mainstream: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub emails: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub phones: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub avatars: Vec<String>,
    // Unrecognized fields are kept for the raw view.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn scalar_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(scalar_string))
}

/// `null` or a non-list reads as empty; non-scalar items are skipped.
fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_string).collect(),
        _ => Vec::new(),
    })
}

/// Captured result of a finished pipeline process.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Events the controller emits for presentation layers.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    ScanStarted { target: String },
    ScanFinished { target: String, result: ScanResult },
    Info(InfoEvent),
}

/// Outcome of a scan as seen by the UI. Errors are flattened to text because the
/// UI only ever displays them.
#[derive(Debug, Clone)]
pub enum ScanResult {
    Succeeded(PipelineOutput),
    Failed(String),
}

/// Structured info events consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    ScanBusy,
    Pruned { removed: usize, failed: usize },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::ScanBusy => "A scan is already running; wait for it to finish".to_string(),
            InfoEvent::Pruned { removed, failed } => {
                if *failed == 0 {
                    format!("Pruned {} old run(s)", removed)
                } else {
                    format!("Pruned {} old run(s), {} could not be removed", removed, failed)
                }
            }
        }
    }
}
