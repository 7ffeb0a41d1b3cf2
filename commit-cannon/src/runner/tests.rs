use super::*;
use crate::actions::{Action, ReplaceLine};
use crate::config::Reviewers;
use crate::pull_requests::PrResult;
use crate::workspace::{Workspace, WorkspaceError};
use std::collections::HashSet;
use std::sync::Mutex;
use tempfile::TempDir;

const SEEDED_FILE: &str = ".env.example";
const SEEDED_CONTENT: &str = "DB_HOST=localhost\nDB_USER=core\n";

#[derive(Default)]
struct FakeWorkspaces {
    fail_clone: HashSet<String>,
    existing_branch: HashSet<String>,
    fail_push: HashSet<String>,
    unchanged: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeWorkspaces {
    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl WorkspaceManager for FakeWorkspaces {
    async fn prepare(&self, repository: &RepositoryDescriptor) -> Result<Workspace, WorkspaceError> {
        self.log(format!("prepare {}", repository.name));
        if self.fail_clone.contains(&repository.name) {
            return Err(WorkspaceError::CloneFailed {
                repository: repository.name.clone(),
                message: "repository not found".to_string(),
            });
        }

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SEEDED_FILE), SEEDED_CONTENT).unwrap();
        Ok(Workspace::new(repository, dir))
    }

    async fn new_branch(&self, workspace: &Workspace, branch: &str) -> Result<(), WorkspaceError> {
        self.log(format!("branch {} {branch}", workspace.repository()));
        if self.existing_branch.contains(workspace.repository()) {
            return Err(WorkspaceError::BranchExists {
                repository: workspace.repository().to_string(),
                branch: branch.to_string(),
            });
        }
        Ok(())
    }

    async fn commit_and_push(
        &self,
        workspace: &Workspace,
        branch: &str,
        message: &str,
    ) -> Result<CommitOutcome, WorkspaceError> {
        self.log(format!("commit {} {branch} {message}", workspace.repository()));
        if self.fail_push.contains(workspace.repository()) {
            return Err(WorkspaceError::CommitPushFailed {
                branch: branch.to_string(),
                message: "permission denied".to_string(),
            });
        }
        if self.unchanged {
            return Ok(CommitOutcome::NothingToCommit);
        }
        Ok(CommitOutcome::Committed)
    }
}

#[derive(Default)]
struct FakePublisher {
    fail_create: bool,
    fail_reviewers: bool,
    created: Mutex<Vec<PrRequest>>,
    reviewer_calls: Mutex<Vec<(String, u64)>>,
}

impl Publisher for FakePublisher {
    async fn create_pr(&self, request: &PrRequest) -> Result<PrResult, PublishError> {
        if self.fail_create {
            return Err(PublishError::RemoteRejected {
                operation: "pull request creation",
                status: 422,
                message: "Validation Failed".to_string(),
            });
        }

        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        let number = created.len() as u64;
        Ok(PrResult {
            url: format!("https://github.com/{}/pull/{number}", request.repository),
            number,
        })
    }

    async fn add_reviewers(
        &self,
        repository: &str,
        number: u64,
        _reviewers: &Reviewers,
    ) -> Result<(), PublishError> {
        self.reviewer_calls
            .lock()
            .unwrap()
            .push((repository.to_string(), number));
        if self.fail_reviewers {
            return Err(PublishError::RemoteRejected {
                operation: "reviewer request",
                status: 422,
                message: "Reviews may only be requested from collaborators".to_string(),
            });
        }
        Ok(())
    }
}

fn replace(source: &str, target: &str) -> Action {
    Action::ReplaceLine(ReplaceLine {
        source: source.to_string(),
        target: target.to_string(),
        path: SEEDED_FILE.to_string(),
    })
}

fn batch(repositories: &[&str], actions: Vec<Action>) -> BatchConfig {
    BatchConfig {
        title: "Switch DB user".to_string(),
        branch_name: "switch-db-user".to_string(),
        commit_message: "Use SA database user".to_string(),
        description: "Rotates credentials.".to_string(),
        body_template: None,
        reviewers: Reviewers::default(),
        repositories: repositories
            .iter()
            .map(|name| RepositoryDescriptor {
                name: (*name).to_string(),
                base: None,
            })
            .collect(),
        actions,
    }
}

#[tokio::test]
async fn failing_repository_does_not_stop_siblings() {
    let workspaces = FakeWorkspaces {
        fail_clone: HashSet::from(["acme/b".to_string()]),
        ..Default::default()
    };
    let runner = BatchRunner::new(workspaces, FakePublisher::default());
    let batch = batch(
        &["acme/a", "acme/b", "acme/c"],
        vec![replace("DB_USER=core", "DB_USER=SA")],
    );

    let summary = runner.run(&batch).await;

    assert_eq!(summary.repositories_processed(), 3);
    assert_eq!(summary.prs_created, 2);
    assert_eq!(summary.repositories_failed, 1);
    assert!(matches!(
        summary.get("acme/b"),
        Some(RepositoryOutcome::Failed {
            stage: Stage::Prepare,
            ..
        })
    ));
    let order: Vec<_> = summary.results.iter().map(|r| r.repository.as_str()).collect();
    assert_eq!(order, vec!["acme/a", "acme/b", "acme/c"]);
    assert!(summary.has_failures());
}

#[tokio::test]
async fn no_actions_skips_without_commit_or_pr() {
    let runner = BatchRunner::new(FakeWorkspaces::default(), FakePublisher::default());

    let summary = runner.run(&batch(&["acme/a"], Vec::new())).await;

    assert_eq!(summary.get("acme/a"), Some(&RepositoryOutcome::SkippedNoChanges));
    assert!(!runner
        .workspaces
        .calls()
        .iter()
        .any(|call| call.starts_with("commit")));
    assert!(runner.publisher.created.lock().unwrap().is_empty());
    assert!(summary.all_success());
}

#[tokio::test]
async fn unchanged_tree_is_skipped() {
    let workspaces = FakeWorkspaces {
        unchanged: true,
        ..Default::default()
    };
    let runner = BatchRunner::new(workspaces, FakePublisher::default());

    let summary = runner
        .run(&batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=core")]))
        .await;

    assert_eq!(summary.get("acme/a"), Some(&RepositoryOutcome::SkippedNoChanges));
    assert_eq!(summary.repositories_skipped, 1);
    assert!(runner.publisher.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn action_failure_after_no_op_action_is_reported() {
    let workspaces = FakeWorkspaces {
        unchanged: true,
        ..Default::default()
    };
    let runner = BatchRunner::new(workspaces, FakePublisher::default());
    let batch = batch(
        &["acme/a"],
        vec![
            replace("DB_USER=core", "DB_USER=core"),
            replace("DB_PORT=5432", "DB_PORT=1433"),
        ],
    );

    let summary = runner.run(&batch).await;

    match summary.get("acme/a") {
        Some(RepositoryOutcome::Failed {
            stage: Stage::Actions,
            error,
        }) => assert!(error.starts_with("action #2 (replace-line)")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(summary.has_failures());
    assert!(runner.publisher.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn later_action_failure_publishes_applied_part() {
    let runner = BatchRunner::new(FakeWorkspaces::default(), FakePublisher::default());
    let batch = batch(
        &["acme/a"],
        vec![
            replace("DB_USER=core", "DB_USER=SA"),
            replace("DB_PORT=5432", "DB_PORT=1433"),
            replace("DB_HOST=localhost", "DB_HOST=db"),
        ],
    );

    let summary = runner.run(&batch).await;

    match summary.get("acme/a") {
        Some(RepositoryOutcome::PartialSuccess { pr, errors, .. }) => {
            assert_eq!(pr.number, 1);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("action #2 (replace-line)"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let created = runner.publisher.created.lock().unwrap();
    assert!(created[0]
        .body
        .contains("  * Replaced `DB_USER=core` with `DB_USER=SA` in `.env.example`\n"));
    assert!(!created[0].body.contains("DB_HOST"));
    assert_eq!(summary.prs_partial, 1);
    assert!(summary.has_failures());
}

#[tokio::test]
async fn first_action_failure_fails_repository() {
    let runner = BatchRunner::new(FakeWorkspaces::default(), FakePublisher::default());

    let summary = runner
        .run(&batch(&["acme/a"], vec![replace("DB_PORT=5432", "DB_PORT=1433")]))
        .await;

    assert!(matches!(
        summary.get("acme/a"),
        Some(RepositoryOutcome::Failed {
            stage: Stage::Actions,
            ..
        })
    ));
    assert!(!runner
        .workspaces
        .calls()
        .iter()
        .any(|call| call.starts_with("commit")));
}

#[tokio::test]
async fn existing_branch_fails_repository() {
    let workspaces = FakeWorkspaces {
        existing_branch: HashSet::from(["acme/a".to_string()]),
        ..Default::default()
    };
    let runner = BatchRunner::new(workspaces, FakePublisher::default());

    let summary = runner
        .run(&batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]))
        .await;

    match summary.get("acme/a") {
        Some(RepositoryOutcome::Failed {
            stage: Stage::Branch,
            error,
        }) => assert!(error.contains("switch-db-user")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn push_failure_opens_no_pr() {
    let workspaces = FakeWorkspaces {
        fail_push: HashSet::from(["acme/a".to_string()]),
        ..Default::default()
    };
    let runner = BatchRunner::new(workspaces, FakePublisher::default());

    let summary = runner
        .run(&batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]))
        .await;

    assert!(matches!(
        summary.get("acme/a"),
        Some(RepositoryOutcome::Failed {
            stage: Stage::Commit,
            ..
        })
    ));
    assert!(runner.publisher.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_pr_fails_repository() {
    let publisher = FakePublisher {
        fail_create: true,
        ..Default::default()
    };
    let runner = BatchRunner::new(FakeWorkspaces::default(), publisher);

    let summary = runner
        .run(&batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]))
        .await;

    match summary.get("acme/a") {
        Some(RepositoryOutcome::Failed {
            stage: Stage::PullRequest,
            error,
        }) => {
            assert!(error.contains("422"));
            assert!(error.contains("https://github.com/acme/a/pull/new/switch-db-user"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn reviewer_failure_is_a_warning() {
    let publisher = FakePublisher {
        fail_reviewers: true,
        ..Default::default()
    };
    let runner = BatchRunner::new(FakeWorkspaces::default(), publisher);
    let mut batch = batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]);
    batch.reviewers = Reviewers {
        users: vec!["octocat".to_string()],
        teams: Vec::new(),
    };

    let summary = runner.run(&batch).await;

    match summary.get("acme/a") {
        Some(RepositoryOutcome::Success { pr, warnings }) => {
            assert_eq!(pr.number, 1);
            assert_eq!(warnings.len(), 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(summary.warnings, 1);
    assert!(summary.all_success());
    assert_eq!(
        *runner.publisher.reviewer_calls.lock().unwrap(),
        vec![("acme/a".to_string(), 1)]
    );
}

#[tokio::test]
async fn reviewers_not_requested_when_none_configured() {
    let runner = BatchRunner::new(FakeWorkspaces::default(), FakePublisher::default());

    runner
        .run(&batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]))
        .await;

    assert!(runner.publisher.reviewer_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn pr_request_uses_batch_and_repository_fields() {
    let runner = BatchRunner::new(FakeWorkspaces::default(), FakePublisher::default());
    let mut batch = batch(&["acme/a"], vec![replace("DB_USER=core", "DB_USER=SA")]);
    batch.repositories[0].base = Some("develop".to_string());

    let summary = runner.run(&batch).await;

    assert!(summary.all_success());
    let created = runner.publisher.created.lock().unwrap();
    assert_eq!(
        created[0],
        PrRequest {
            repository: "acme/a".to_string(),
            base: "develop".to_string(),
            title: "Switch DB user".to_string(),
            head: "switch-db-user".to_string(),
            body: "Rotates credentials.\n\nChanges applied by commit-cannon:\n  \
                   * Replaced `DB_USER=core` with `DB_USER=SA` in `.env.example`\n"
                .to_string(),
        }
    );
    assert_eq!(
        runner.workspaces.calls(),
        vec![
            "prepare acme/a".to_string(),
            "branch acme/a switch-db-user".to_string(),
            "commit acme/a switch-db-user Use SA database user".to_string(),
        ]
    );
}
