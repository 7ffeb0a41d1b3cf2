//! Declarative actions applied to a repository working copy.
//!
//! Actions are read from the batch file as a single discriminated record
//! ([`ActionDefinition`]) and converted into the closed [`Action`] enum before
//! any repository is touched, so a batch with an unknown `type` is rejected up
//! front.

mod error;
mod replace_line;
mod run_command;

pub use error::ActionError;
pub use replace_line::ReplaceLine;
pub use run_command::RunCommand;

use serde::Deserialize;
use std::path::{Component, Path};

/// Kind name of [`ReplaceLine`].
pub const REPLACE_LINE: &str = "replace-line";

/// Kind name of [`RunCommand`].
pub const RUN_COMMAND: &str = "run-command";

/// Raw action entry as written in the batch file.
///
/// Only the fields relevant to `type` are read; the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDefinition {
    /// Action kind discriminator.
    #[serde(rename = "type")]
    pub kind: String,

    /// Line to replace (`replace-line`).
    pub source: Option<String>,

    /// Replacement line (`replace-line`).
    pub target: Option<String>,

    /// Workspace-relative file path (`replace-line`).
    pub path: Option<String>,

    /// Command line (`run-command`).
    pub run: Option<String>,
}

/// A single unit of change applied to a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace one line in a file.
    ReplaceLine(ReplaceLine),

    /// Run a shell command.
    RunCommand(RunCommand),
}

impl Action {
    /// Returns the kind name used in the batch file.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReplaceLine(_) => REPLACE_LINE,
            Self::RunCommand(_) => RUN_COMMAND,
        }
    }

    /// Human-readable preview of what the action will do.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ReplaceLine(action) => format!(
                "replace `{}` with `{}` in `{}`",
                action.source, action.target, action.path
            ),
            Self::RunCommand(action) => format!("run `{}`", action.run),
        }
    }

    /// Applies the action inside `workspace`, returning a description of what it did.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] describing why the action could not be applied.
    pub async fn apply(&self, workspace: &Path) -> Result<String, ActionError> {
        match self {
            Self::ReplaceLine(action) => action.apply(workspace),
            Self::RunCommand(action) => action.apply(workspace).await,
        }
    }

    fn validate(&self) -> Result<(), ActionError> {
        match self {
            Self::ReplaceLine(action) => action.validate(),
            Self::RunCommand(action) => action.validate(),
        }
    }
}

impl TryFrom<ActionDefinition> for Action {
    type Error = ActionError;

    fn try_from(definition: ActionDefinition) -> Result<Self, Self::Error> {
        let action = match definition.kind.as_str() {
            REPLACE_LINE | "replaceLine" => Self::ReplaceLine(ReplaceLine {
                source: field(REPLACE_LINE, "source", definition.source)?,
                target: field(REPLACE_LINE, "target", definition.target)?,
                path: field(REPLACE_LINE, "path", definition.path)?,
            }),
            RUN_COMMAND | "runCommand" => Self::RunCommand(RunCommand {
                run: field(RUN_COMMAND, "run", definition.run)?,
            }),
            other => {
                return Err(ActionError::UnknownKind {
                    kind: other.to_string(),
                })
            }
        };

        action.validate()?;
        Ok(action)
    }
}

fn field(
    kind: &'static str,
    name: &'static str,
    value: Option<String>,
) -> Result<String, ActionError> {
    value.ok_or(ActionError::MissingField { kind, field: name })
}

pub(crate) fn require(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::MissingField { kind, field });
    }
    Ok(())
}

/// Rejects paths that would leave the workspace.
pub(crate) fn check_relative_path(kind: &'static str, path: &str) -> Result<(), ActionError> {
    let escapes = Path::new(path).components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(ActionError::InvalidField {
            kind,
            field: "path",
            reason: format!("'{path}' must be relative to the repository root"),
        });
    }
    Ok(())
}
