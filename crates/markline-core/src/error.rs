//! Error types for markline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MarklineError
pub type Result<T> = std::result::Result<T, MarklineError>;

/// Main error type for markline operations
#[derive(Debug, Error)]
pub enum MarklineError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// History provider errors
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Commit message parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Changelog scanning errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// A commit message that is not a conventional commit.
///
/// Always local to one commit: a scan drops the commit and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing to parse
    #[error("Commit message is empty")]
    Empty,

    /// The first line does not match `type[(scope)][!]: description`
    #[error("Malformed commit header: {header:?}")]
    MalformedHeader { header: String },

    /// A section is not separated from the previous one by a blank line
    #[error("Missing blank line before line {line}")]
    MissingSeparator { line: usize },

    /// A line in the footer block is not a `Token: value` trailer
    #[error("Malformed footer on line {line}: {content:?}")]
    MalformedFooter { line: usize, content: String },
}

/// Errors from the history provider transport
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Branch or revision could not be resolved
    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    /// API error from the hosting service
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A blocking history read did not complete
    #[error("History task failed: {0}")]
    Task(String),
}

/// Errors raised while resolving a release and collecting its commits
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// History ran out before any marker commit was found
    #[error("Reached the end of history without finding a release commit")]
    EndOfHistory,

    /// History ran out before the requested release was found
    #[error("Release {version} was not found in history")]
    VersionNotFound { version: String },

    /// A marker commit without a scope; release lines cannot be told apart
    #[error("Release commit {sha} for version {version} has no scope")]
    MissingScope { version: String, sha: String },

    /// The scanner already resolved a release
    #[error("A release has already been resolved: {version}")]
    AlreadyResolved { version: String },

    /// Transport errors, forwarded unchanged
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ChangelogError {
    /// Whether the error means the requested release does not exist, as
    /// opposed to a transport failure
    pub fn is_release_missing(&self) -> bool {
        matches!(
            self,
            Self::EndOfHistory | Self::VersionNotFound { .. } | Self::MissingScope { .. }
        )
    }
}
