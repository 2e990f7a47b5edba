//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for markline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where commit history comes from
    pub source: SourceConfig,

    /// Release boundary scanning
    pub scan: ScanConfig,

    /// Changelog rendering
    pub changelog: ChangelogConfig,
}

/// Kind of history provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub REST API
    #[default]
    Github,
    /// Local git repository
    Local,
}

/// History source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Provider kind
    pub kind: SourceKind,

    /// Repository owner (GitHub)
    pub owner: Option<String>,

    /// Repository name (GitHub)
    pub repository: Option<String>,

    /// Branch to read history from.
    ///
    /// GitHub falls back to `main`; a local source starts from HEAD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// API base URL (GitHub)
    pub api_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Repository path (local)
    pub path: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Github,
            owner: None,
            repository: None,
            branch: None,
            api_url: super::defaults::DEFAULT_API_URL.to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            path: None,
        }
    }
}

impl SourceConfig {
    /// Read the API token from the configured environment variable
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.is_empty())
    }
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Commit type that marks a release
    pub marker_type: String,

    /// Number of commits requested per page
    pub page_size: u32,

    /// Only resolve releases of this scope (release line)
    pub scope: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            marker_type: super::defaults::DEFAULT_MARKER_TYPE.to_string(),
            page_size: super::defaults::DEFAULT_PAGE_SIZE,
            scope: None,
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Renderer name (markdown, slack)
    pub format: String,

    /// Sections in output order; commit types not listed are left out
    pub sections: Vec<SectionConfig>,

    /// Whether commit bodies are rendered under their description
    pub include_bodies: bool,

    /// Output file (stdout when unset)
    pub output: Option<PathBuf>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_string(),
            sections: super::defaults::default_sections(),
            include_bodies: true,
            output: None,
        }
    }
}

/// One changelog section: a commit type and its heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Commit type collected in this section
    #[serde(rename = "type")]
    pub commit_type: String,

    /// Heading shown for the section
    pub heading: String,
}

impl SectionConfig {
    /// Create a section
    pub fn new(commit_type: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            commit_type: commit_type.into(),
            heading: heading.into(),
        }
    }
}
