//! External pipeline invocation.
//!
//! The pipeline is an opaque executable. It is configured only through
//! environment variables and receives the target as its single argument.

use crate::error::ScanError;
use crate::model::{PipelineOutput, ScanConfig};
use std::path::{Path, PathBuf};
use tokio::process::Command;

fn flag(v: bool) -> String {
    if v { "1" } else { "0" }.to_string()
}

/// Environment entries handed to the pipeline, layered over the inherited environment.
pub fn build_env(cfg: &ScanConfig) -> Vec<(&'static str, String)> {
    vec![
        ("RESULTS_BASE", cfg.results_base.display().to_string()),
        ("DEEP", flag(cfg.deep)),
        ("DEEP_X", flag(cfg.include_x)),
        ("COMPACT", flag(cfg.compact)),
        ("SINGLE_FOLDER", flag(cfg.single_folder)),
        ("TOP_OPEN", cfg.top_open.to_string()),
        ("FAST", flag(cfg.fast)),
    ]
}

/// Anchor a relative script path at the current directory so it is never
/// looked up through `PATH`.
pub fn resolve_script(p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(p))
        .unwrap_or_else(|_| p.to_path_buf())
}

pub struct PipelineInvoker {
    path: PathBuf,
}

impl PipelineInvoker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: resolve_script(&path.into()),
        }
    }

    /// Check the request before anything is spawned. Returns the trimmed target.
    pub fn validate<'a>(&self, target: &'a str) -> Result<&'a str, ScanError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ScanError::EmptyTarget);
        }
        if !self.path.exists() {
            return Err(ScanError::PipelineNotFound(self.path.clone()));
        }
        Ok(target)
    }

    /// Run the pipeline for `target` and wait for it to exit.
    ///
    /// There is no timeout and no cancellation: once spawned the child runs to
    /// completion even if the caller stops caring.
    pub async fn run(&self, target: &str, cfg: &ScanConfig) -> Result<PipelineOutput, ScanError> {
        let target = self.validate(target)?;

        let mut cmd = Command::new(&self.path);
        cmd.arg(target)
            .envs(build_env(cfg))
            .stdin(std::process::Stdio::null())
            .kill_on_drop(false);

        tracing::info!(pipeline = %self.path.display(), scan_target = target, "starting pipeline");
        let started = std::time::Instant::now();
        let out = cmd.output().await.map_err(|source| ScanError::Spawn {
            path: self.path.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
        tracing::info!(
            scan_target = target,
            status = ?out.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline exited"
        );

        if !out.status.success() {
            let detail = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            return Err(ScanError::PipelineFailed {
                code: out.status.code(),
                detail,
            });
        }

        Ok(PipelineOutput {
            code: out.status.code().unwrap_or(0),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cfg(base: &Path) -> ScanConfig {
        ScanConfig {
            results_base: base.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_env_flags() {
        let c = ScanConfig {
            results_base: PathBuf::from("/tmp/res"),
            deep: true,
            include_x: false,
            compact: true,
            single_folder: false,
            top_open: 3,
            fast: true,
        };
        let env = build_env(&c);
        let get = |k: &str| env.iter().find(|(n, _)| *n == k).map(|(_, v)| v.as_str());
        assert_eq!(get("RESULTS_BASE"), Some("/tmp/res"));
        assert_eq!(get("DEEP"), Some("1"));
        assert_eq!(get("DEEP_X"), Some("0"));
        assert_eq!(get("COMPACT"), Some("1"));
        assert_eq!(get("SINGLE_FOLDER"), Some("0"));
        assert_eq!(get("TOP_OPEN"), Some("3"));
        assert_eq!(get("FAST"), Some("1"));
        assert_eq!(env.len(), 7);
    }

    #[test]
    fn test_relative_script_is_anchored_at_cwd() {
        let invoker = PipelineInvoker::new("osint-master.sh");
        assert!(invoker.path.is_absolute());
        assert_eq!(
            invoker.path,
            std::env::current_dir().unwrap().join("osint-master.sh")
        );
        let abs = PathBuf::from("/opt/osint/run.sh");
        assert_eq!(PipelineInvoker::new(abs.clone()).path, abs);
    }

    #[test]
    fn test_validate_empty_target() {
        let inv = PipelineInvoker::new("/definitely/missing.sh");
        assert!(matches!(inv.validate("   "), Err(ScanError::EmptyTarget)));
    }

    #[test]
    fn test_validate_missing_pipeline() {
        let inv = PipelineInvoker::new("/definitely/missing.sh");
        assert!(matches!(
            inv.validate("alice"),
            Err(ScanError::PipelineNotFound(_))
        ));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("pipeline.sh");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_target_with_quote_is_one_argument() {
            let dir = TempDir::new().unwrap();
            let inv = PipelineInvoker::new(script(
                dir.path(),
                r#"printf '%s' "$#" > "$RESULTS_BASE/argc"; printf '%s' "$1" > "$RESULTS_BASE/argv""#,
            ));
            let target = "o'brien; echo pwned";
            inv.run(target, &cfg(dir.path())).await.unwrap();

            assert_eq!(fs::read_to_string(dir.path().join("argc")).unwrap(), "1");
            assert_eq!(fs::read_to_string(dir.path().join("argv")).unwrap(), target);
        }

        #[tokio::test]
        async fn test_env_reaches_process() {
            let dir = TempDir::new().unwrap();
            let inv = PipelineInvoker::new(script(
                dir.path(),
                r#"echo "$DEEP$DEEP_X$COMPACT$SINGLE_FOLDER$TOP_OPEN$FAST""#,
            ));
            let out = inv.run("alice", &cfg(dir.path())).await.unwrap();
            assert_eq!(out.code, 0);
            assert_eq!(out.stdout.trim(), "101100");
        }

        #[tokio::test]
        async fn test_target_is_trimmed() {
            let dir = TempDir::new().unwrap();
            let inv = PipelineInvoker::new(script(dir.path(), r#"printf '[%s]' "$1""#));
            let out = inv.run("  alice \n", &cfg(dir.path())).await.unwrap();
            assert_eq!(out.stdout, "[alice]");
        }

        #[tokio::test]
        async fn test_failure_prefers_stderr() {
            let dir = TempDir::new().unwrap();
            let inv = PipelineInvoker::new(script(dir.path(), "echo out; echo err >&2; exit 3"));
            match inv.run("alice", &cfg(dir.path())).await {
                Err(ScanError::PipelineFailed { code, detail }) => {
                    assert_eq!(code, Some(3));
                    assert_eq!(detail.trim(), "err");
                }
                other => panic!("unexpected: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_failure_falls_back_to_stdout() {
            let dir = TempDir::new().unwrap();
            let inv = PipelineInvoker::new(script(dir.path(), "echo only-out; exit 1"));
            match inv.run("alice", &cfg(dir.path())).await {
                Err(ScanError::PipelineFailed { detail, .. }) => {
                    assert_eq!(detail.trim(), "only-out");
                }
                other => panic!("unexpected: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_non_executable_is_spawn_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("plain.txt");
            fs::write(&path, "not a script").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
            let inv = PipelineInvoker::new(path);
            assert!(matches!(
                inv.run("alice", &cfg(dir.path())).await,
                Err(ScanError::Spawn { .. })
            ));
        }
    }
}
