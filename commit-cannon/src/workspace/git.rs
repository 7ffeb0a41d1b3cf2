//! Thin wrapper over the `git` command line.

use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// A `git` invocation that could not be run or exited unsuccessfully.
#[derive(Debug, Error)]
#[error("git {command} failed: {message}")]
pub(crate) struct GitCommandError {
    command: String,
    message: String,
}

/// Runs `git` with `args` inside `path` and returns its trimmed stdout.
///
/// Credential prompts are disabled so an authentication problem fails the
/// command instead of blocking the batch.
pub(crate) async fn run_git_command(path: &Path, args: &[&str]) -> Result<String, GitCommandError> {
    let command = args.first().copied().unwrap_or_default().to_string();

    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| GitCommandError {
            command: command.clone(),
            message: format!("failed to execute: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitCommandError {
            command,
            message: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
