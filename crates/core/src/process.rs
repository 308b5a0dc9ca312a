//! External process execution.
//!
//! History extraction only needs "run a command, capture stdout as text",
//! expressed by the [`CommandRunner`] trait so it can be scripted in tests.
//! The packaging, docs and upload commands stream their output straight to
//! the terminal through [`run_inherited`].

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::ToolError;

/// Runs an external program and captures its standard output.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`, returning stdout decoded as text.
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String, ToolError>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String, ToolError> {
        let mut cmd = Command::new(program);
        cmd.current_dir(cwd)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(cmd = ?format!("{} {}", program, args.join(" ")), "running command");
        let output = cmd.output().await.map_err(|e| spawn_error(program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(program, exit_code, %stderr, "command failed");
            return Err(ToolError::CommandFailed {
                program: program.to_string(),
                exit_code,
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Run a command with inherited stdio, failing on a non-zero exit status.
pub async fn run_inherited(program: &str, args: &[String], cwd: &Path) -> Result<(), ToolError> {
    debug!(cmd = ?format!("{} {}", program, args.join(" ")), "running command");
    let status = Command::new(program)
        .current_dir(cwd)
        .args(args)
        .status()
        .await
        .map_err(|e| spawn_error(program, e))?;

    if !status.success() {
        let exit_code = status.code().unwrap_or(-1);
        warn!(program, exit_code, "command failed");
        return Err(ToolError::CommandFailed {
            program: program.to_string(),
            exit_code,
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Whether `binary` resolves to an executable on `$PATH` (or is a usable path).
pub fn tool_available(binary: &str) -> bool {
    match which::which(binary) {
        Ok(path) => {
            debug!(binary, path = %path.display(), "tool resolved");
            true
        }
        Err(_) => {
            debug!(binary, "tool not found");
            false
        }
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> ToolError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ToolError::BinaryNotFound(program.to_string())
    } else {
        ToolError::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemRunner
            .run("gitdist-definitely-not-installed", &["--version"], dir.path())
            .await;
        assert!(matches!(result, Err(ToolError::BinaryNotFound(ref b)) if b == "gitdist-definitely-not-installed"));
    }

    #[tokio::test]
    async fn test_inherited_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_inherited("gitdist-definitely-not-installed", &[], dir.path()).await;
        assert!(matches!(result, Err(ToolError::BinaryNotFound(_))));
    }

    #[test]
    fn test_tool_available_for_unknown_binary() {
        assert!(!tool_available("gitdist-definitely-not-installed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let out = SystemRunner.run("sh", &["-c", "echo hello"], dir.path()).await.unwrap();
        assert_eq!(out, "hello\n");

        let err = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::CommandFailed { exit_code: 3, ref stderr, .. } if stderr == "oops"
        ));
    }
}
