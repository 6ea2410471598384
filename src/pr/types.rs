use serde::Deserialize;

/// `owner/repo` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The comment thread of one pull request (GitHub treats PRs as issues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueThread {
    pub repo: RepoRef,
    pub issue_number: u64,
}

/// An issue comment as returned by the GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// GitHub omits the body for some comment types
    #[serde(default)]
    pub body: Option<String>,
}

/// Where this run was triggered from.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// GitHub event name (e.g., "pull_request", "push")
    pub event_name: String,
    pub repo: Option<RepoRef>,
    pub issue_number: Option<u64>,
}
