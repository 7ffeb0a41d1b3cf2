#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod actions;
pub mod config;
pub mod pull_requests;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod workspace;

pub use actions::{Action, ActionError};
pub use config::{BatchConfig, ConfigError, RepositoryDescriptor, Reviewers};
pub use pull_requests::{GitHubPublisher, PrRequest, PrResult, PublishError, Publisher};
pub use runner::{BatchRunner, Runner, RunnerConfig, RunnerError};
pub use summary::{RepositoryOutcome, RepositoryResult, RunSummary, Stage};
pub use templates::{TemplateError, TemplateRenderer};
pub use workspace::{
    CommitOutcome, GitWorkspaceManager, Workspace, WorkspaceError, WorkspaceManager,
};
