//! CLI for commit-cannon.
//!
//! Applies the actions of a batch file to every listed repository and opens a
//! pull request per repository.

use clap::Parser;
use commit_cannon::{RepositoryOutcome, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// commit-cannon - Apply one batch of edits across many repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the batch file.
    #[arg(long, default_value = "cannon.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print the plan without cloning, pushing or opening PRs.
    #[arg(long)]
    dry_run: bool,

    /// GitHub REST API endpoint.
    #[arg(long, default_value = commit_cannon::pull_requests::DEFAULT_API_URL)]
    api_url: String,

    /// Remote the repositories are cloned from and pushed to.
    #[arg(long, default_value = commit_cannon::workspace::DEFAULT_GIT_REMOTE)]
    git_remote: String,

    /// Directory to create workspaces in (defaults to the system temp dir).
    #[arg(long)]
    workspace_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Sets up the global tracing subscriber.
///
/// Compact single-line output; the level comes from `RUST_LOG` and falls back
/// to "info" when unset or invalid.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.config, args.token, args.dry_run)
        .with_api_url(args.api_url)
        .with_git_remote(args.git_remote);
    if let Some(root) = args.workspace_root {
        config = config.with_workspace_root(root);
    }
    Runner::new(config).run().await
}

/// Prints one line per repository followed by the totals.
fn print_summary(summary: &RunSummary) {
    if summary.dry_run {
        println!("Summary:\n  Mode: Dry Run");
        return;
    }

    println!("\nResults:");
    for result in &summary.results {
        let detail = match &result.outcome {
            RepositoryOutcome::Success { pr, warnings } => {
                format_with_notes(&pr.url, &[], warnings)
            }
            RepositoryOutcome::PartialSuccess {
                pr,
                errors,
                warnings,
            } => format_with_notes(&pr.url, errors, warnings),
            RepositoryOutcome::Failed { stage, error } => format!("{stage}: {error}"),
            RepositoryOutcome::SkippedNoChanges => "no changes".to_string(),
        };
        println!(
            "  [{}] {}: {}",
            result.outcome.as_str(),
            result.repository,
            detail
        );
    }

    println!("\nSummary:");
    println!("  Mode: Live");
    println!(
        "  Repositories processed: {}",
        summary.repositories_processed()
    );
    println!("  PRs created: {}", summary.prs_created);
    println!("  PRs partially applied: {}", summary.prs_partial);
    println!("  Repositories skipped: {}", summary.repositories_skipped);
    println!("  Repositories failed: {}", summary.repositories_failed);
    println!("  Warnings: {}", summary.warnings);
}

fn format_with_notes(url: &str, errors: &[String], warnings: &[String]) -> String {
    let mut line = url.to_string();
    for error in errors {
        line.push_str(&format!("\n      error: {error}"));
    }
    for warning in warnings {
        line.push_str(&format!("\n      warning: {warning}"));
    }
    line
}
