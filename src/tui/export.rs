use crate::findings::RunView;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// File name for a findings export, e.g. `osint-alice-20240101_120000.json`.
pub fn export_file_name(view: &RunView) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect()
    };
    let when = view
        .timestamp
        .as_deref()
        .map(|t| t.replace(':', "-").replace('T', "_"))
        .unwrap_or_else(|| {
            view.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
    format!("osint-{}-{}.json", clean(&view.target), clean(&when))
}

/// Export the findings of a run into `dir`.
/// Returns the absolute path of the exported file.
pub fn export_findings_json(view: &RunView, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(view));
    crate::storage::export_json(&path, view)?;
    Ok(path)
}

/// Export into the current directory.
pub fn export_findings_json_here(view: &RunView) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    export_findings_json(view, &current_dir)
}

/// Initialize the clipboard manager thread if not already initialized.
/// This creates a background thread that processes clipboard operations sequentially,
/// keeping each clipboard instance alive for a sufficient duration.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        // Clipboard managers on Linux read lazily from the owner.
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Copy text to clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Run, Summary};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn view(summary: Option<Summary>) -> RunView {
        let run = Run {
            path: PathBuf::from("/base/o'neil/20240101-1200"),
            target_dir: "o'neil".into(),
            modified: SystemTime::now(),
        };
        RunView::from_parts(&run, summary)
    }

    #[test]
    fn test_file_name_from_timestamp() {
        let s = Summary {
            timestamp: Some("2024-01-01T12:00:00".into()),
            ..Default::default()
        };
        assert_eq!(
            export_file_name(&view(Some(s))),
            "osint-o-neil-2024-01-01_12-00-00.json"
        );
    }

    #[test]
    fn test_file_name_from_folder() {
        assert_eq!(
            export_file_name(&view(None)),
            "osint-o-neil-20240101-1200.json"
        );
    }

    #[test]
    fn test_export_writes_findings() {
        let dir = TempDir::new().unwrap();
        let s = Summary {
            phones: vec!["+1".into(), "+1".into()],
            ..Default::default()
        };
        let path = export_findings_json(&view(Some(s)), dir.path()).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(v["findings"]["phones"], serde_json::json!(["+1"]));
        assert_eq!(v["target"], "o'neil");
    }
}
