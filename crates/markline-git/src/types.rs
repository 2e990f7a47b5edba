//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw commit as delivered by a history provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Full, unprocessed commit message
    pub message: String,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// When the change was authored
    pub authored_at: DateTime<Utc>,
    /// Committer name
    pub committer: String,
    /// Committer email
    pub committer_email: String,
    /// When the commit was created
    pub committed_at: DateTime<Utc>,
    /// Link to the commit on the hosting service
    pub url: Option<String>,
}

impl CommitInfo {
    /// Create a new CommitInfo; the committer defaults to the author
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();
        let author = author.into();
        let author_email = author_email.into();

        Self {
            hash,
            short_hash,
            message: message.into(),
            committer: author.clone(),
            committer_email: author_email.clone(),
            author,
            author_email,
            authored_at: timestamp,
            committed_at: timestamp,
            url: None,
        }
    }

    /// Set the committer
    pub fn with_committer(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        self.committer = name.into();
        self.committer_email = email.into();
        self.committed_at = timestamp;
        self
    }

    /// Set the commit URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}
