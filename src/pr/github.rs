use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, instrument};

use super::types::{Comment, IssueThread, RepoRef};
use super::{CommentApi, PrError};

const PER_PAGE: usize = 100;

/// Issue-comment client for the GitHub REST API.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: Option<&str>) -> Result<Self, PrError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(PrError::MissingToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("python-doctor"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn comments_url(&self, thread: &IssueThread) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, thread.repo.owner, thread.repo.repo, thread.issue_number
        )
    }
}

#[async_trait]
impl CommentApi for GitHubClient {
    /// Every comment on the thread, following pages until a short one.
    #[instrument(skip(self, thread), fields(repo = %thread.repo, issue = thread.issue_number))]
    async fn list_comments(&self, thread: &IssueThread) -> Result<Vec<Comment>, PrError> {
        let url = self.comments_url(thread);
        let mut page = 1_u32;
        let mut comments = Vec::new();
        loop {
            let chunk: Vec<Comment> = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            let chunk_len = chunk.len();
            comments.extend(chunk);
            if chunk_len < PER_PAGE {
                break;
            }
            page = page.saturating_add(1);
        }
        debug!(count = comments.len(), pages = page, "listed comments");
        Ok(comments)
    }

    #[instrument(skip(self, repo), fields(repo = %repo))]
    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<(), PrError> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, repo.owner, repo.repo, comment_id
        );
        self.http
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        debug!("deleted comment");
        Ok(())
    }

    #[instrument(skip(self, thread, body), fields(repo = %thread.repo, issue = thread.issue_number, chars = body.chars().count()))]
    async fn create_comment(&self, thread: &IssueThread, body: &str) -> Result<Comment, PrError> {
        let comment: Comment = self
            .http
            .post(self.comments_url(thread))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(id = comment.id, "created comment");
        Ok(comment)
    }
}
