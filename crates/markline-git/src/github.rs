//! GitHub history provider
//!
//! Reads the commit list of one branch through the REST API
//! (`GET /repos/{owner}/{repo}/commits`), one page per request.
//!
//! ## Authentication
//!
//! A token is optional; without one the unauthenticated rate limit applies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use markline_core::config::{SourceConfig, DEFAULT_API_URL, DEFAULT_BRANCH};
use markline_core::HistoryError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::pager::{HistoryPager, Result};
use crate::types::CommitInfo;

/// GitHub provider configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL
    pub api_url: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repository: String,
    /// Branch to read
    pub branch: String,
    /// API token
    pub token: Option<String>,
}

impl GitHubConfig {
    /// Create a configuration for `owner/repository` on `main`
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: owner.into(),
            repository: repository.into(),
            branch: DEFAULT_BRANCH.to_string(),
            token: None,
        }
    }

    /// Build from the `source` section of the configuration.
    ///
    /// Returns `None` when owner or repository is missing.
    pub fn from_source(source: &SourceConfig) -> Option<Self> {
        Some(Self {
            api_url: source.api_url.clone(),
            owner: source.owner.clone()?,
            repository: source.repository.clone()?,
            branch: source
                .branch
                .clone()
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            token: source.token(),
        })
    }

    /// Set the branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn commits_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/commits",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repository
        )
    }
}

/// History provider backed by the GitHub REST API
pub struct GitHubHistory {
    config: GitHubConfig,
    client: Client,
}

impl GitHubHistory {
    /// Create a new GitHub history provider
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("markline/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(
            owner = %config.owner,
            repository = %config.repository,
            branch = %config.branch,
            authenticated = config.token.is_some(),
            "GitHub history source created"
        );

        Ok(Self { config, client })
    }

    /// Provider configuration
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }
}

#[async_trait]
impl HistoryPager for GitHubHistory {
    fn name(&self) -> &str {
        "github"
    }

    #[instrument(skip(self), fields(owner = %self.config.owner, repository = %self.config.repository))]
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>> {
        debug!(page, per_page, branch = %self.config.branch, "loading page of commit history");

        let mut request = self
            .client
            .get(self.config.commits_url())
            .query(&[
                ("sha", self.config.branch.clone()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .header(ACCEPT, "application/vnd.github+json");

        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        // An empty repository answers 409 Conflict instead of an empty list
        if status == StatusCode::CONFLICT {
            debug!("repository has no commits");
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HistoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let commits: Vec<GitHubCommit> = response.json().await?;
        debug!(page, count = commits.len(), "page of commit history loaded");

        Ok(commits
            .into_iter()
            .map(GitHubCommit::into_commit_info)
            .collect())
    }
}

/// Commit entry of the list commits response
#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    html_url: Option<String>,
    commit: GitHubCommitData,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitData {
    message: String,
    author: Option<GitHubSignature>,
    committer: Option<GitHubSignature>,
}

#[derive(Debug, Deserialize)]
struct GitHubSignature {
    name: String,
    email: String,
    date: DateTime<Utc>,
}

impl GitHubCommit {
    fn into_commit_info(self) -> CommitInfo {
        let data = self.commit;
        let (author, author_email, authored_at) = match data.author {
            Some(sig) => (sig.name, sig.email, sig.date),
            None => (String::new(), String::new(), DateTime::<Utc>::UNIX_EPOCH),
        };

        let mut info = CommitInfo::new(
            self.sha,
            data.message,
            author,
            author_email,
            authored_at,
        );

        if let Some(sig) = data.committer {
            info = info.with_committer(sig.name, sig.email, sig.date);
        }
        if let Some(url) = self.html_url {
            info = info.with_url(url);
        }

        info
    }
}
