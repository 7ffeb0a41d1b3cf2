//! Batch file loading and validation.

use crate::actions::{Action, ActionDefinition};
use crate::config::{ConfigError, RepositoryDescriptor, Reviewers};
use crate::templates::TemplateRenderer;
use bstr::ByteSlice;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Raw contents of a batch file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct BatchFile {
    title: String,
    branch_name: String,
    commit_message: String,
    #[serde(default)]
    description: String,
    body_template: Option<String>,
    #[serde(default)]
    reviewers: Reviewers,
    #[serde(default)]
    repos: Vec<RepositoryDescriptor>,
    #[serde(default)]
    actions: Vec<ActionDefinition>,
}

/// A validated batch: what to change, where, and how to publish it.
///
/// Immutable once loaded; the runner receives it by reference.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pull request title.
    pub title: String,

    /// Branch created in every repository.
    pub branch_name: String,

    /// Commit message for the applied changes.
    pub commit_message: String,

    /// Free-form text placed at the top of every PR description.
    pub description: String,

    /// Optional handlebars template overriding the default PR body.
    pub body_template: Option<String>,

    /// Reviewers requested on every created PR.
    pub reviewers: Reviewers,

    /// Target repositories, in processing order.
    pub repositories: Vec<RepositoryDescriptor>,

    /// Actions applied to every repository, in order.
    pub actions: Vec<Action>,
}

impl BatchConfig {
    /// Loads and validates a batch file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or fails validation (including unknown action types).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading batch file");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parses and validates batch file contents; `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is invalid.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: BatchFile = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: origin.to_string(),
            source: e,
        })?;

        let invalid = |message: String| ConfigError::ValidationError {
            path: origin.to_string(),
            message,
        };

        for (field, value) in [
            ("title", &file.title),
            ("branch-name", &file.branch_name),
            ("commit-message", &file.commit_message),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{field} must not be empty")));
            }
        }

        validate_branch_name(&file.branch_name).map_err(invalid)?;
        validate_repositories(&file.repos).map_err(invalid)?;
        validate_reviewers(&file.reviewers).map_err(invalid)?;

        if let Some(template) = &file.body_template {
            TemplateRenderer::check(template)
                .map_err(|e| invalid(format!("body-template is invalid: {e}")))?;
        }

        if file.actions.is_empty() {
            return Err(invalid("at least one action is required".to_string()));
        }

        let actions = file
            .actions
            .into_iter()
            .enumerate()
            .map(|(index, definition)| {
                Action::try_from(definition).map_err(|e| ConfigError::InvalidAction {
                    path: origin.to_string(),
                    position: index + 1,
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: file.title,
            branch_name: file.branch_name,
            commit_message: file.commit_message,
            description: file.description,
            body_template: file.body_template,
            reviewers: file.reviewers,
            repositories: file.repos,
            actions,
        })
    }
}

fn validate_branch_name(branch: &str) -> Result<(), String> {
    gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| format!("'{branch}' is not a valid branch name: {e}"))
}

fn validate_repositories(repositories: &[RepositoryDescriptor]) -> Result<(), String> {
    if repositories.is_empty() {
        return Err("at least one repository is required".to_string());
    }

    let mut seen = HashSet::new();
    for repository in repositories {
        let well_formed = repository
            .name
            .split_once('/')
            .is_some_and(|(owner, repo)| {
                !owner.is_empty() && !repo.is_empty() && !repo.contains('/')
            });
        if !well_formed {
            return Err(format!(
                "repository name '{}' must be in owner/repo format",
                repository.name
            ));
        }

        if !seen.insert(repository.name.as_str()) {
            return Err(format!("repository '{}' is listed twice", repository.name));
        }

        if let Some(base) = &repository.base {
            validate_branch_name(base)?;
        }
    }

    Ok(())
}

fn validate_reviewers(reviewers: &Reviewers) -> Result<(), String> {
    let blank = reviewers
        .users
        .iter()
        .chain(&reviewers.teams)
        .any(|name| name.trim().is_empty());
    if blank {
        return Err("reviewer names must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionError, ReplaceLine, RunCommand};
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
title = "PR title"
branch-name = "new-example-branch"
commit-message = "Committing cannon changes"
description = """
Description line 1

Description line 2"""

[reviewers]
users = ["user1"]
teams = ["team1"]

[[repos]]
name = "TouchBistro/cannon"

[[repos]]
name = "TouchBistro/example"
base = "develop"

[[actions]]
type = "replace-line"
source = "DB_USER=core"
target = "DB_USER=SA"
path = ".env.example"

[[actions]]
type = "run-command"
run = "yarn"
"#;

    fn with_actions(actions: &str) -> String {
        format!(
            r#"
title = "t"
branch-name = "b"
commit-message = "m"

[[repos]]
name = "acme/widget"

{actions}
"#
        )
    }

    #[test]
    fn loads_sample_batch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cannon.toml");
        fs::write(&path, SAMPLE).unwrap();

        let batch = BatchConfig::load(&path).unwrap();

        assert_eq!(batch.title, "PR title");
        assert_eq!(batch.branch_name, "new-example-branch");
        assert_eq!(batch.commit_message, "Committing cannon changes");
        assert_eq!(batch.description, "Description line 1\n\nDescription line 2");
        assert_eq!(batch.reviewers.users, vec!["user1".to_string()]);
        assert_eq!(batch.reviewers.teams, vec!["team1".to_string()]);
        assert_eq!(batch.repositories.len(), 2);
        assert_eq!(batch.repositories[0].base_branch(), "master");
        assert_eq!(batch.repositories[1].base_branch(), "develop");
        assert_eq!(
            batch.actions,
            vec![
                Action::ReplaceLine(ReplaceLine {
                    source: "DB_USER=core".to_string(),
                    target: "DB_USER=SA".to_string(),
                    path: ".env.example".to_string(),
                }),
                Action::RunCommand(RunCommand {
                    run: "yarn".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();

        let result = BatchConfig::load(&temp.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn unknown_action_type_rejects_batch() {
        let content = with_actions(
            r#"
[[actions]]
type = "run-command"
run = "make"

[[actions]]
type = "delete-everything"
"#,
        );

        let err = BatchConfig::from_toml_str(&content, "inline").unwrap_err();

        match err {
            ConfigError::InvalidAction {
                position, source, ..
            } => {
                assert_eq!(position, 2);
                assert!(matches!(source, ActionError::UnknownKind { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn misspelled_reviewer_category_is_rejected() {
        let content = format!(
            "{}\n[reviewers]\nuser = [\"a\"]\n",
            with_actions("[[actions]]\ntype = \"run-command\"\nrun = \"make\"")
        );

        let result = BatchConfig::from_toml_str(&content, "inline");

        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn duplicate_repository_is_rejected() {
        let content = r#"
title = "t"
branch-name = "b"
commit-message = "m"

[[repos]]
name = "acme/widget"

[[repos]]
name = "acme/widget"
base = "main"

[[actions]]
type = "run-command"
run = "make"
"#;

        let result = BatchConfig::from_toml_str(content, "inline");

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn malformed_repository_name_is_rejected() {
        let content = with_actions("[[actions]]\ntype = \"run-command\"\nrun = \"make\"")
            .replace("acme/widget", "widget");

        let result = BatchConfig::from_toml_str(&content, "inline");

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn invalid_branch_name_is_rejected() {
        let content = with_actions("[[actions]]\ntype = \"run-command\"\nrun = \"make\"")
            .replace("branch-name = \"b\"", "branch-name = \"bad..name\"");

        let result = BatchConfig::from_toml_str(&content, "inline");

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn batch_without_actions_is_rejected() {
        let result = BatchConfig::from_toml_str(&with_actions(""), "inline");

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn malformed_body_template_is_rejected() {
        let content = with_actions("[[actions]]\ntype = \"run-command\"\nrun = \"make\"")
            .replace(
                "commit-message = \"m\"",
                "commit-message = \"m\"\nbody-template = \"{{#each results}}\"",
            );

        let result = BatchConfig::from_toml_str(&content, "inline");

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
