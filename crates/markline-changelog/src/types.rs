//! Changelog types

use std::collections::BTreeMap;

use markline_git::CommitInfo;
use serde::{Deserialize, Serialize};

/// A commit message parsed into its conventional parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit type (feat, fix, release, ...), lowercased
    pub commit_type: String,
    /// Scope (optional, in parentheses), lowercased
    pub scope: Option<String>,
    /// Single-line summary
    pub description: String,
    /// Commit body
    pub body: Option<String>,
    /// Whether this is a breaking change
    pub breaking: bool,
    /// Text of the `BREAKING CHANGE:` footer
    pub breaking_description: Option<String>,
    /// Trailer lines, keyed by token with original casing
    pub footers: BTreeMap<String, String>,
    /// Raw commit this record was parsed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<CommitInfo>,
}

impl CommitRecord {
    /// Create a record with only a type and a description
    pub fn new(commit_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            scope: None,
            description: description.into(),
            body: None,
            breaking: false,
            breaking_description: None,
            footers: BTreeMap::new(),
            origin: None,
        }
    }

    /// Set the scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach the raw commit
    pub fn with_origin(mut self, origin: CommitInfo) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Hash of the raw commit, when known
    pub fn sha(&self) -> Option<&str> {
        self.origin.as_ref().map(|o| o.hash.as_str())
    }

    /// Whether this commit is a release marker of the given type
    pub fn is_marker(&self, marker_type: &str) -> bool {
        self.commit_type == marker_type
    }

    /// Render the record back into a canonical commit message.
    ///
    /// `!` is only written when the record is breaking without a
    /// `BREAKING CHANGE` description; the footer carries the flag otherwise.
    pub fn to_message(&self) -> String {
        let mut message = self.commit_type.clone();

        if let Some(scope) = &self.scope {
            message.push('(');
            message.push_str(scope);
            message.push(')');
        }
        if self.breaking && self.breaking_description.is_none() {
            message.push('!');
        }
        message.push_str(": ");
        message.push_str(&self.description);

        if let Some(body) = &self.body {
            message.push_str("\n\n");
            message.push_str(body);
        }

        let mut footer_lines = Vec::with_capacity(self.footers.len() + 1);
        if let Some(breaking) = &self.breaking_description {
            footer_lines.push(format!("BREAKING CHANGE: {}", breaking));
        }
        for (token, value) in &self.footers {
            footer_lines.push(format!("{}: {}", token, value));
        }
        if !footer_lines.is_empty() {
            message.push_str("\n\n");
            message.push_str(&footer_lines.join("\n"));
        }

        message
    }
}

impl std::fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.commit_type)?;
        if let Some(scope) = &self.scope {
            write!(f, "({})", scope)?;
        }
        if self.breaking {
            write!(f, "!")?;
        }
        write!(f, ": {}", self.description)
    }
}

/// Counters collected while scanning history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Pages requested from the history provider, including the final empty one
    pub pages_fetched: u32,
    /// Raw commits received
    pub commits_seen: usize,
    /// Commits dropped because their message is not a conventional commit
    pub malformed: usize,
}

/// The commits that make up one release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogResult {
    /// Version, from the marker's description
    pub version: String,
    /// Release notes, from the marker's body
    pub version_description: String,
    /// The marker commit of the release
    pub release_marker: CommitRecord,
    /// Commits of the release, oldest first
    pub commits: Vec<CommitRecord>,
    /// Scan counters
    pub stats: ScanStats,
}

impl ChangelogResult {
    /// Scope of the release line
    pub fn scope(&self) -> Option<&str> {
        self.release_marker.scope.as_deref()
    }

    /// Commits of one type, oldest first
    pub fn commits_of_type<'a>(
        &'a self,
        commit_type: &'a str,
    ) -> impl Iterator<Item = &'a CommitRecord> + 'a {
        self.commits
            .iter()
            .filter(move |c| c.commit_type == commit_type)
    }

    /// Commits flagged as breaking
    pub fn breaking_changes(&self) -> impl Iterator<Item = &CommitRecord> {
        self.commits.iter().filter(|c| c.breaking)
    }

    /// Check if the release has no commits
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_message_header_only() {
        let record = CommitRecord::new("feat", "Add login button.");
        assert_eq!(record.to_message(), "feat: Add login button.");
    }

    #[test]
    fn test_to_message_breaking_marker() {
        let mut record = CommitRecord::new("feat", "Remove v1 endpoint.").with_scope("api");
        record.breaking = true;
        assert_eq!(record.to_message(), "feat(api)!: Remove v1 endpoint.");
    }

    #[test]
    fn test_to_message_with_footers() {
        let mut record = CommitRecord::new("fix", "X.").with_body("Body.");
        record.breaking = true;
        record.breaking_description = Some("Y.".to_string());
        record
            .footers
            .insert("Reviewed-by".to_string(), "Alice".to_string());

        assert_eq!(
            record.to_message(),
            "fix: X.\n\nBody.\n\nBREAKING CHANGE: Y.\nReviewed-by: Alice"
        );
    }

    #[test]
    fn test_display() {
        let mut record = CommitRecord::new("release", "2.0.0").with_scope("prod");
        assert_eq!(record.to_string(), "release(prod): 2.0.0");
        record.breaking = true;
        assert_eq!(record.to_string(), "release(prod)!: 2.0.0");
    }

    #[test]
    fn test_result_helpers() {
        let mut breaking = CommitRecord::new("feat", "Drop legacy flag.");
        breaking.breaking = true;

        let result = ChangelogResult {
            version: "2.0.0".to_string(),
            version_description: String::new(),
            release_marker: CommitRecord::new("release", "2.0.0").with_scope("prod"),
            commits: vec![
                CommitRecord::new("fix", "Patch race."),
                breaking,
                CommitRecord::new("feat", "Add login button."),
            ],
            stats: ScanStats::default(),
        };

        assert_eq!(result.scope(), Some("prod"));
        assert_eq!(result.commits_of_type("feat").count(), 2);
        assert_eq!(result.breaking_changes().count(), 1);
        assert!(!result.is_empty());
    }
}
