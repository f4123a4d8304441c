//! Application-level orchestration utilities.
//!
//! This module owns the scan lifecycle and the post-scan processing: retention,
//! run discovery and label building. UI/CLI layers call into this module to keep
//! responsibilities separated.

#[cfg_attr(not(feature = "tui"), allow(dead_code))]
mod controller;
mod post_process;

#[cfg(feature = "tui")]
pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use post_process::{load_runs, process_scan_completion, LoadedRuns};
