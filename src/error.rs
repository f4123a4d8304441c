use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single scan request. Each one ends the current action only.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Enter a target username.")]
    EmptyTarget,

    #[error("Pipeline script not found: {}", .0.display())]
    PipelineNotFound(PathBuf),

    #[error("Failed to start pipeline: {}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline failed (exit {}): {detail}", exit_label(.code))]
    PipelineFailed { code: Option<i32>, detail: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}
