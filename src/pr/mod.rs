pub mod comments;
pub mod github;
pub mod types;

pub use comments::{sync_report_comment, CommentAction, CommentState};
pub use github::GitHubClient;

use types::{Comment, IssueThread, RepoRef, RunContext};

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid repository (expected owner/repo): {0}")]
    InvalidRepo(String),

    #[error("Missing pull request context: {0}")]
    MissingContext(&'static str),

    #[error("Failed to read event payload: {0}")]
    EventPayload(String),

    #[error("GitHub token not found in environment")]
    MissingToken,
}

/// The four comment verbs the upsert needs from the hosting platform.
#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn list_comments(&self, thread: &IssueThread) -> Result<Vec<Comment>, PrError>;

    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<(), PrError>;

    async fn create_comment(&self, thread: &IssueThread, body: &str) -> Result<Comment, PrError>;
}

/// Parse `owner/repo`.
pub fn parse_repo(value: &str) -> Result<RepoRef, PrError> {
    let (owner, repo) = value
        .trim()
        .split_once('/')
        .ok_or_else(|| PrError::InvalidRepo(value.to_string()))?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(PrError::InvalidRepo(value.to_string()));
    }
    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// PR number from a ref like `refs/pull/42/merge`.
pub fn pr_number_from_ref(git_ref: &str) -> Option<u64> {
    let rest = git_ref.strip_prefix("refs/pull/")?;
    let (number, _) = rest.split_once('/')?;
    number.parse().ok()
}

/// PR number from a webhook event payload: `pull_request.number`, then `number`.
pub fn pr_number_from_event(payload: &str) -> Result<Option<u64>, PrError> {
    #[derive(Deserialize)]
    struct PullRequest {
        number: u64,
    }

    #[derive(Deserialize)]
    struct Event {
        pull_request: Option<PullRequest>,
        number: Option<u64>,
    }

    let event: Event =
        serde_json::from_str(payload).map_err(|e| PrError::EventPayload(e.to_string()))?;
    Ok(event.pull_request.map(|pr| pr.number).or(event.number))
}

/// CLI values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub event: Option<String>,
    pub repo: Option<String>,
    pub pr: Option<u64>,
}

/// Only `pull_request` events may post. `pull_request_target` does not.
pub fn is_pull_request_event(event_name: &str) -> bool {
    event_name == "pull_request"
}

fn event_name(overrides: &ContextOverrides, var: impl Fn(&str) -> Option<String>) -> String {
    overrides
        .event
        .clone()
        .or_else(|| var("GITHUB_EVENT_NAME"))
        .unwrap_or_default()
}

/// Resolve the run context from GitHub Actions environment variables.
///
/// GITHUB_EVENT_NAME, GITHUB_REPOSITORY, and the PR number from the payload
/// at GITHUB_EVENT_PATH, falling back to GITHUB_REF. An override replaces
/// the matching variable, which is then not read at all.
pub fn context_from_env(
    overrides: &ContextOverrides,
    var: impl Fn(&str) -> Option<String>,
) -> Result<RunContext, PrError> {
    let event_name = event_name(overrides, &var);
    let repo = match overrides.repo.as_deref() {
        Some(repo) => Some(parse_repo(repo)?),
        None => var("GITHUB_REPOSITORY")
            .filter(|r| !r.is_empty())
            .map(|r| parse_repo(&r))
            .transpose()?,
    };

    let mut issue_number = overrides.pr;
    if issue_number.is_none() {
        if let Some(path) = var("GITHUB_EVENT_PATH").filter(|p| !p.is_empty()) {
            let payload = std::fs::read_to_string(Path::new(&path))
                .map_err(|e| PrError::EventPayload(format!("{path}: {e}")))?;
            issue_number = pr_number_from_event(&payload)?;
        }
    }
    if issue_number.is_none() {
        issue_number = var("GITHUB_REF").as_deref().and_then(pr_number_from_ref);
    }

    debug!(event = %event_name, repo = ?repo, issue = ?issue_number, "resolved run context");
    Ok(RunContext {
        event_name,
        repo,
        issue_number,
    })
}

/// Decide what this run does to the PR thread.
///
/// Only the event name is read up front. Repository and PR number are
/// resolved only when the run is eligible to post, so runs that leave the
/// thread alone never fail on a bad payload or repository value. Returns
/// `None` for [`CommentAction::Leave`].
pub fn plan_comment(
    should_post: bool,
    has_findings: bool,
    overrides: &ContextOverrides,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Option<(CommentAction, IssueThread)>, PrError> {
    let event = event_name(overrides, &var);
    let action = CommentAction::decide(should_post, is_pull_request_event(&event), has_findings);
    if action == CommentAction::Leave {
        debug!(event = %event, should_post, "run not eligible to post");
        return Ok(None);
    }

    let context = context_from_env(overrides, &var)?;
    debug!(event = %context.event_name, ?action, "run eligible to post");
    Ok(Some((action, context.thread()?)))
}

impl RunContext {
    /// The comment thread for this run. Both repo and number are required.
    pub fn thread(&self) -> Result<IssueThread, PrError> {
        let repo = self
            .repo
            .clone()
            .ok_or(PrError::MissingContext("repository (GITHUB_REPOSITORY or --repo)"))?;
        let issue_number = self
            .issue_number
            .ok_or(PrError::MissingContext("pull request number (--pr)"))?;
        Ok(IssueThread { repo, issue_number })
    }
}
