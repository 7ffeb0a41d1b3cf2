//! Single-line substitution inside a workspace file.

use super::{check_relative_path, require, ActionError};
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const KIND: &str = super::REPLACE_LINE;

/// Replaces the first line equal to `source` with `target` in the file at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceLine {
    /// Exact line content to look for, without its line terminator.
    pub source: String,

    /// Replacement line content.
    pub target: String,

    /// File path relative to the workspace root.
    pub path: String,
}

impl ReplaceLine {
    /// Checks that the action can be applied at all.
    ///
    /// `target` may be empty (blanking a line), but `source` and `path` may not.
    /// A whitespace-only `source` is a real line and is allowed. Neither line
    /// may contain a line break, since the file's line count must stay the same.
    pub(crate) fn validate(&self) -> Result<(), ActionError> {
        if self.source.is_empty() {
            return Err(ActionError::MissingField {
                kind: KIND,
                field: "source",
            });
        }
        require(KIND, "path", &self.path)?;
        for (field, value) in [("source", &self.source), ("target", &self.target)] {
            if value.contains(['\n', '\r']) {
                return Err(ActionError::InvalidField {
                    kind: KIND,
                    field,
                    reason: "must be a single line".to_string(),
                });
            }
        }
        check_relative_path(KIND, &self.path)
    }

    /// Applies the substitution inside `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotFound`] if the file does not exist and
    /// [`ActionError::NoMatch`] if no line equals `source`.
    pub fn apply(&self, workspace: &Path) -> Result<String, ActionError> {
        self.validate()?;

        let file = workspace.join(&self.path);
        debug!(path = %file.display(), "Replacing line");

        let contents = match std::fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ActionError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => {
                return Err(ActionError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let updated = replace_first_line(&contents, &self.source, &self.target).ok_or_else(|| {
            ActionError::NoMatch {
                path: self.path.clone(),
                source_line: self.source.clone(),
            }
        })?;

        std::fs::write(&file, updated).map_err(|e| ActionError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(format!(
            "Replaced `{}` with `{}` in `{}`",
            self.source, self.target, self.path
        ))
    }
}

/// Swaps the first line equal to `source` for `target`, keeping every line
/// terminator as it was. Returns `None` when no line matches.
fn replace_first_line(contents: &str, source: &str, target: &str) -> Option<String> {
    let mut output = String::with_capacity(contents.len() + target.len());
    let mut replaced = false;

    for line in contents.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        if !replaced && body == source {
            output.push_str(target);
            output.push_str(ending);
            replaced = true;
        } else {
            output.push_str(line);
        }
    }

    replaced.then_some(output)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}
