//! Scan lifecycle controller.
//!
//! Owns pipeline invocation and emits events for presentation layers. Only one
//! scan runs at a time; requests made while busy are refused.

use crate::model::{DashboardEvent, InfoEvent, ScanConfig, ScanResult};
use crate::pipeline::PipelineInvoker;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Scan { target: String, config: ScanConfig },
    Quit,
}

/// Internal handle for a running scan task.
struct ScanCtx {
    target: String,
    handle: Option<tokio::task::JoinHandle<ScanResult>>,
}

/// Validate and spawn a scan. Validation failures are reported without spawning.
fn start_scan(
    invoker: &Arc<PipelineInvoker>,
    target: String,
    config: ScanConfig,
    event_tx: &UnboundedSender<DashboardEvent>,
) -> Option<ScanCtx> {
    let trimmed = match invoker.validate(&target) {
        Ok(t) => t.to_string(),
        Err(e) => {
            let _ = event_tx.send(DashboardEvent::ScanFinished {
                target,
                result: ScanResult::Failed(e.to_string()),
            });
            return None;
        }
    };

    let _ = event_tx.send(DashboardEvent::ScanStarted {
        target: trimmed.clone(),
    });
    let inv = invoker.clone();
    let t = trimmed.clone();
    let handle = tokio::spawn(async move {
        match inv.run(&t, &config).await {
            Ok(out) => ScanResult::Succeeded(out),
            Err(e) => ScanResult::Failed(e.to_string()),
        }
    });
    Some(ScanCtx {
        target: trimmed,
        handle: Some(handle),
    })
}

/// Serve scan requests from the UI until it quits.
pub(crate) async fn run_controller(
    pipeline: PathBuf,
    initial: Option<(String, ScanConfig)>,
    event_tx: UnboundedSender<DashboardEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let invoker = Arc::new(PipelineInvoker::new(pipeline));
    let mut scan_ctx =
        initial.and_then(|(target, config)| start_scan(&invoker, target, config, &event_tx));
    let mut quit_pending = false;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let closed = cmd.is_none();
                match cmd {
                    Some(UiCommand::Scan { target, config }) => {
                        if scan_ctx.is_some() {
                            let _ = event_tx.send(DashboardEvent::Info(InfoEvent::ScanBusy));
                        } else {
                            scan_ctx = start_scan(&invoker, target, config, &event_tx);
                        }
                    }
                    // A closed channel means the UI is gone; same as quit.
                    Some(UiCommand::Quit) | None => {
                        // The pipeline cannot be cancelled, so quitting waits for it.
                        if scan_ctx.is_some() {
                            if !quit_pending {
                                let _ = event_tx.send(DashboardEvent::Info(InfoEvent::Message(
                                    "Waiting for the running pipeline to finish…".into(),
                                )));
                            }
                            quit_pending = true;
                            if closed {
                                // Nothing more to receive; block on the scan directly.
                                if let Some(mut ctx) = scan_ctx.take() {
                                    if let Some(h) = ctx.handle.take() {
                                        let _ = h.await;
                                    }
                                }
                                return Ok(());
                            }
                        } else {
                            return Ok(());
                        }
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut scan_ctx {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    let target = scan_ctx
                        .take()
                        .map(|ctx| ctx.target)
                        .unwrap_or_default();
                    let result = match join_res {
                        Ok(r) => r,
                        Err(e) => ScanResult::Failed(format!("Scan task failed: {e}")),
                    };
                    let _ = event_tx.send(DashboardEvent::ScanFinished { target, result });
                    if quit_pending {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn cfg() -> ScanConfig {
        ScanConfig::default()
    }

    #[tokio::test]
    async fn test_missing_pipeline_is_reported_not_spawned() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let ctrl = tokio::spawn(run_controller(
            PathBuf::from("/definitely/missing.sh"),
            None,
            event_tx,
            cmd_rx,
        ));
        cmd_tx
            .send(UiCommand::Scan {
                target: "alice".into(),
                config: cfg(),
            })
            .unwrap();
        cmd_tx.send(UiCommand::Quit).unwrap();
        ctrl.await.unwrap().unwrap();

        match event_rx.recv().await {
            Some(DashboardEvent::ScanFinished {
                result: ScanResult::Failed(msg),
                ..
            }) => assert!(msg.contains("not found")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_target_is_reported() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let ctrl = tokio::spawn(run_controller(
            PathBuf::from("/definitely/missing.sh"),
            Some(("  ".into(), cfg())),
            event_tx,
            cmd_rx,
        ));
        drop(cmd_tx);
        ctrl.await.unwrap().unwrap();

        match event_rx.recv().await {
            Some(DashboardEvent::ScanFinished {
                result: ScanResult::Failed(msg),
                ..
            }) => assert_eq!(msg, "Enter a target username."),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_second_scan_refused_and_quit_waits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("slow.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 1\necho done-$1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let ctrl = tokio::spawn(run_controller(
            script,
            Some(("alice".into(), cfg())),
            event_tx,
            cmd_rx,
        ));

        assert!(matches!(
            event_rx.recv().await,
            Some(DashboardEvent::ScanStarted { .. })
        ));
        cmd_tx
            .send(UiCommand::Scan {
                target: "bob".into(),
                config: cfg(),
            })
            .unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(DashboardEvent::Info(InfoEvent::ScanBusy))
        ));

        cmd_tx.send(UiCommand::Quit).unwrap();
        assert!(matches!(
            event_rx.recv().await,
            Some(DashboardEvent::Info(InfoEvent::Message(_)))
        ));
        match event_rx.recv().await {
            Some(DashboardEvent::ScanFinished {
                target,
                result: ScanResult::Succeeded(out),
            }) => {
                assert_eq!(target, "alice");
                assert_eq!(out.stdout.trim(), "done-alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        ctrl.await.unwrap().unwrap();
    }
}
