use tracing::{info, instrument};

use super::types::{Comment, IssueThread};
use super::{CommentApi, PrError};
use crate::report::MARKER;

/// Whether the PR currently carries a report comment from this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentState {
    NoComment,
    HasComment(u64),
}

/// What one sync did to the PR thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub deleted: Vec<u64>,
    pub created: Option<u64>,
}

impl UpsertOutcome {
    pub fn final_state(&self) -> CommentState {
        match self.created {
            Some(id) => CommentState::HasComment(id),
            None => CommentState::NoComment,
        }
    }
}

/// What a run does to the PR thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    /// Not eligible to post: the thread is not touched.
    Leave,
    /// Eligible but clean: remove any stale report comment.
    Clear,
    /// Eligible with findings: delete then create.
    Replace,
}

impl CommentAction {
    pub fn decide(should_post: bool, is_pull_request: bool, has_findings: bool) -> Self {
        match (should_post && is_pull_request, has_findings) {
            (false, _) => CommentAction::Leave,
            (true, false) => CommentAction::Clear,
            (true, true) => CommentAction::Replace,
        }
    }
}

fn is_report_comment(comment: &Comment) -> bool {
    comment
        .body
        .as_deref()
        .is_some_and(|body| body.starts_with(MARKER))
}

/// Replace this tool's comment on the thread.
///
/// Deletes every prior comment carrying the marker, then creates a new one
/// when `body` is given. Not atomic: a failure between delete and create
/// leaves no comment until the next run. Two overlapping runs on the same
/// PR can each create a comment; callers needing stronger guarantees must
/// serialize runs per PR.
#[instrument(skip(api, thread, body), fields(repo = %thread.repo, issue = thread.issue_number, post = body.is_some()))]
pub async fn sync_report_comment(
    api: &dyn CommentApi,
    thread: &IssueThread,
    body: Option<&str>,
) -> Result<UpsertOutcome, PrError> {
    let mut outcome = UpsertOutcome::default();

    let comments = api.list_comments(thread).await?;
    for comment in comments.iter().filter(|c| is_report_comment(c)) {
        api.delete_comment(&thread.repo, comment.id).await?;
        info!(comment_id = comment.id, "deleted previous report comment");
        outcome.deleted.push(comment.id);
    }

    if let Some(body) = body {
        let created = api.create_comment(thread, body).await?;
        info!(comment_id = created.id, "posted report comment");
        outcome.created = Some(created.id);
    }

    Ok(outcome)
}
