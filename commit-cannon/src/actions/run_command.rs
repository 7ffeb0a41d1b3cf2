//! Arbitrary shell command execution inside a workspace.

use super::{require, ActionError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

const KIND: &str = super::RUN_COMMAND;

/// Runs a command line through the platform shell with the workspace as working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    /// Command line passed verbatim to the shell.
    pub run: String,
}

impl RunCommand {
    pub(crate) fn validate(&self) -> Result<(), ActionError> {
        require(KIND, "run", &self.run)
    }

    /// Runs the command in `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::ExecutionFailed`] with the captured error output
    /// when the command exits unsuccessfully.
    pub async fn apply(&self, workspace: &Path) -> Result<String, ActionError> {
        self.validate()?;
        debug!(command = %self.run, "Running command");

        let output = shell(&self.run)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ActionError::Spawn {
                command: self.run.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(ActionError::ExecutionFailed {
                command: self.run.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(format!("Ran `{}`", self.run))
    }
}

#[cfg(not(windows))]
fn shell(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}
