//! Release boundary scanning
//!
//! History arrives newest first. A release is the stretch of commits between
//! its marker commit and the next older marker of the same scope:
//!
//! ```text
//! feat: A               <- not released yet, skipped
//! release(prod): 2.0.0  <- resolved marker
//! fix: B                \
//! release(qa): 2.0.0-rc  > commits of 2.0.0 (other scopes are content)
//! feat: C               /
//! release(prod): 1.0.0  <- boundary, excluded
//! ```
//!
//! If history ends before the older marker, everything read so far belongs to
//! the release.

mod options;

pub use options::ScannerOptions;

use std::collections::VecDeque;

use markline_core::ChangelogError;
use markline_git::HistoryPager;
use tracing::{debug, info, instrument, warn};

use crate::parser::ConventionalParser;
use crate::types::{ChangelogResult, CommitRecord, ScanStats};

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// The marker a scan has settled on
#[derive(Debug, Clone)]
struct ResolvedRelease {
    version: String,
    scope: String,
    marker: CommitRecord,
}

/// Finds one release in a paged commit history.
///
/// A scanner reads a single history stream once: resolve a release, then
/// call [`changelog`](Self::changelog), which consumes it.
pub struct ChangelogScanner<P> {
    pager: P,
    parser: ConventionalParser,
    options: ScannerOptions,
    buffer: VecDeque<CommitRecord>,
    next_page: u32,
    exhausted: bool,
    resolved: Option<ResolvedRelease>,
    stats: ScanStats,
}

impl<P: HistoryPager> ChangelogScanner<P> {
    /// Create a scanner over a history provider
    pub fn new(pager: P, options: ScannerOptions) -> Self {
        info!(
            pager = pager.name(),
            marker_type = %options.marker_type,
            page_size = options.page_size,
            scope = ?options.scope,
            "changelog scanner created"
        );

        Self {
            pager,
            parser: ConventionalParser::new(),
            options,
            buffer: VecDeque::new(),
            next_page: 1,
            exhausted: false,
            resolved: None,
            stats: ScanStats::default(),
        }
    }

    /// Scanner options
    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Counters so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// The resolved version, if any
    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.version.as_str())
    }

    /// The marker commit of the resolved release, if any
    pub fn release_marker(&self) -> Option<&CommitRecord> {
        self.resolved.as_ref().map(|r| &r.marker)
    }

    /// Resolve the newest release in history and return its version
    pub async fn resolve_latest_version(&mut self) -> Result<String> {
        info!("searching for latest version in commit history");
        self.resolve(None).await
    }

    /// Resolve a specific release by version
    pub async fn resolve_version(&mut self, version: &str) -> Result<()> {
        info!(version, "searching for version in commit history");
        self.resolve(Some(version)).await.map(|_| ())
    }

    /// Collect the commits of the resolved release.
    ///
    /// Resolves the latest release first when nothing has been resolved yet.
    #[instrument(skip(self), fields(pager = self.pager.name()))]
    pub async fn changelog(mut self) -> Result<ChangelogResult> {
        if self.resolved.is_none() {
            info!("version has not been resolved yet");
            self.resolve(None).await?;
        }

        let Some(release) = self.resolved.take() else {
            return Err(ChangelogError::EndOfHistory);
        };

        let mut commits = Vec::new();
        loop {
            let Some(record) = self.next_record().await? else {
                info!(
                    version = %release.version,
                    commits = commits.len(),
                    "changelog reached the end of history"
                );
                break;
            };

            if record.is_marker(&self.options.marker_type)
                && record.scope.as_deref() == Some(release.scope.as_str())
            {
                info!(
                    version = %release.version,
                    previous = %record.description,
                    commits = commits.len(),
                    "reached previous release"
                );
                break;
            }

            debug!(commit = %record, "commit belongs to release");
            commits.push(record);
        }

        // Read newest first; present oldest first
        commits.reverse();

        info!(
            pages = self.stats.pages_fetched,
            seen = self.stats.commits_seen,
            malformed = self.stats.malformed,
            "scan finished"
        );

        Ok(ChangelogResult {
            version: release.version,
            version_description: release.marker.body.clone().unwrap_or_default(),
            release_marker: release.marker,
            commits,
            stats: self.stats,
        })
    }

    /// Skip ahead to a marker, optionally of one version
    #[instrument(skip(self), fields(pager = self.pager.name()))]
    async fn resolve(&mut self, target: Option<&str>) -> Result<String> {
        if let Some(release) = &self.resolved {
            return Err(ChangelogError::AlreadyResolved {
                version: release.version.clone(),
            });
        }

        while let Some(record) = self.next_record().await? {
            if !record.is_marker(&self.options.marker_type) {
                continue;
            }

            if let Some(version) = target {
                if record.description != version {
                    debug!(
                        found = %record.description,
                        version,
                        "found a different version"
                    );
                    continue;
                }
            }

            let Some(scope) = record.scope.clone() else {
                warn!(version = %record.description, "release commit has no scope");
                return Err(ChangelogError::MissingScope {
                    version: record.description.clone(),
                    sha: record.sha().unwrap_or_default().to_string(),
                });
            };

            if let Some(wanted) = &self.options.scope {
                if &scope != wanted {
                    debug!(found = %scope, wanted = %wanted, "skipping release of another scope");
                    continue;
                }
            }

            let version = record.description.clone();
            match &record.origin {
                Some(origin) => info!(
                    version = %version,
                    scope = %scope,
                    sha = %origin.short_hash,
                    author = %origin.author,
                    committer = %origin.committer,
                    "resolved version"
                ),
                None => info!(version = %version, scope = %scope, "resolved version"),
            }

            self.resolved = Some(ResolvedRelease {
                version: version.clone(),
                scope,
                marker: record,
            });
            return Ok(version);
        }

        match target {
            Some(version) => {
                warn!(version, "history ended without the requested version");
                Err(ChangelogError::VersionNotFound {
                    version: version.to_string(),
                })
            }
            None => {
                warn!("history ended without a release commit");
                Err(ChangelogError::EndOfHistory)
            }
        }
    }

    /// Next parsed commit, fetching pages as needed; `None` at end of history
    async fn next_record(&mut self) -> Result<Option<CommitRecord>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let page = self.next_page;
        debug!(page, page_size = self.options.page_size, "loading page of commit history");

        let commits = self.pager.fetch_page(page, self.options.page_size).await?;
        self.next_page += 1;
        self.stats.pages_fetched += 1;

        if commits.is_empty() {
            debug!(page, "no more commits in history");
            self.exhausted = true;
            return Ok(());
        }

        for commit in commits {
            self.stats.commits_seen += 1;
            match self.parser.parse_commit(&commit) {
                Ok(record) => self.buffer.push_back(record),
                Err(e) => {
                    self.stats.malformed += 1;
                    warn!(sha = %commit.short_hash, error = %e, "commit is not a conventional commit");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use markline_core::HistoryError;
    use markline_git::{CommitInfo, MemoryHistory};

    fn history(messages: &[&str]) -> MemoryHistory {
        let commits = messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                CommitInfo::new(
                    format!("{:040x}", i + 1),
                    *message,
                    "Test",
                    "test@example.com",
                    Utc::now(),
                )
            })
            .collect();
        MemoryHistory::new(commits)
    }

    fn descriptions(result: &ChangelogResult) -> Vec<&str> {
        result.commits.iter().map(|c| c.description.as_str()).collect()
    }

    fn scanner(messages: &[&str]) -> ChangelogScanner<MemoryHistory> {
        ChangelogScanner::new(history(messages), ScannerOptions::default())
    }

    #[tokio::test]
    async fn test_latest_release_changelog() {
        let mut scanner = scanner(&[
            "feat: Unreleased work",
            "release(prod): 2.0.0\n\nSpring release.",
            "fix: Patch B.",
            "feat: Add A.",
            "release(prod): 1.0.0",
            "chore: Initial commit",
        ]);

        assert_eq!(scanner.resolve_latest_version().await.unwrap(), "2.0.0");
        let result = scanner.changelog().await.unwrap();

        assert_eq!(result.version, "2.0.0");
        assert_eq!(result.version_description, "Spring release.");
        assert_eq!(result.release_marker.scope.as_deref(), Some("prod"));
        assert_eq!(descriptions(&result), vec!["Add A.", "Patch B."]);
    }

    #[tokio::test]
    async fn test_no_marker_is_end_of_history() {
        let mut scanner = scanner(&["feat: Add A.", "fix: Patch B."]);
        let err = scanner.resolve_latest_version().await.unwrap_err();
        assert!(matches!(err, ChangelogError::EndOfHistory));
    }

    #[tokio::test]
    async fn test_empty_history() {
        let err = scanner(&[]).changelog().await.unwrap_err();
        assert!(matches!(err, ChangelogError::EndOfHistory));
    }

    #[tokio::test]
    async fn test_resolve_specific_version() {
        let mut scanner = scanner(&[
            "release(prod): 2.0.0",
            "feat: Add B.",
            "release(prod): 1.0.0\n\nFirst release.",
            "fix: Patch A.",
            "feat: Add A.",
        ]);

        scanner.resolve_version("1.0.0").await.unwrap();
        assert_eq!(scanner.resolved_version(), Some("1.0.0"));

        let result = scanner.changelog().await.unwrap();
        assert_eq!(result.version_description, "First release.");
        // Oldest release: history end is the boundary
        assert_eq!(descriptions(&result), vec!["Add A.", "Patch A."]);
    }

    #[tokio::test]
    async fn test_version_not_found() {
        let mut scanner = scanner(&["release(prod): 2.0.0", "release(prod): 1.0.0"]);
        let err = scanner.resolve_version("3.0.0").await.unwrap_err();
        match err {
            ChangelogError::VersionNotFound { version } => assert_eq!(version, "3.0.0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_scope_marker_is_content() {
        let result = scanner(&[
            "release(prod): 2.0.0",
            "release(qa): 2.0.0-rc.1",
            "feat: Add A.",
            "release(prod): 1.0.0",
        ])
        .changelog()
        .await
        .unwrap();

        assert_eq!(descriptions(&result), vec!["Add A.", "2.0.0-rc.1"]);
        assert!(result.commits.iter().all(|c| c.description != "1.0.0"));
    }

    #[tokio::test]
    async fn test_malformed_commits_skipped() {
        let result = scanner(&[
            "release(prod): 2.0.0",
            "Merge branch 'main' into prod",
            "fix: Patch B.",
            "WIP",
            "feat: Add A.",
            "release(prod): 1.0.0",
        ])
        .changelog()
        .await
        .unwrap();

        assert_eq!(descriptions(&result), vec!["Add A.", "Patch B."]);
        assert_eq!(result.stats.malformed, 2);
    }

    #[tokio::test]
    async fn test_missing_scope_is_fatal() {
        let mut scanner = scanner(&["release: 2.0.0", "release(prod): 1.0.0"]);
        let err = scanner.resolve_latest_version().await.unwrap_err();
        match err {
            ChangelogError::MissingScope { version, sha } => {
                assert_eq!(version, "2.0.0");
                assert_eq!(sha, format!("{:040x}", 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_pages_across_boundaries() {
        let mut messages = vec!["release(prod): 3.0.0"];
        messages.extend(std::iter::repeat("fix: Small patch.").take(7));
        messages.push("release(prod): 2.0.0");
        messages.push("feat: Older feature.");

        let pager = history(&messages);
        let scanner = ChangelogScanner::new(pager, ScannerOptions::new().with_page_size(3));
        let result = scanner.changelog().await.unwrap();

        assert_eq!(result.commits.len(), 7);
        // 9 commits up to the boundary: pages of 3 are enough, no empty page needed
        assert_eq!(result.stats.pages_fetched, 3);
    }

    #[tokio::test]
    async fn test_end_of_history_requested_once() {
        let pager = history(&["release(prod): 1.0.0", "feat: Add A."]);
        let scanner = ChangelogScanner::new(&pager, ScannerOptions::default());
        let result = scanner.changelog().await.unwrap();

        assert_eq!(descriptions(&result), vec!["Add A."]);
        assert_eq!(pager.requests(), 2);
    }

    #[tokio::test]
    async fn test_second_resolution_fails() {
        let mut scanner = scanner(&["release(prod): 2.0.0", "release(prod): 1.0.0"]);
        scanner.resolve_latest_version().await.unwrap();

        let err = scanner.resolve_version("1.0.0").await.unwrap_err();
        assert!(matches!(err, ChangelogError::AlreadyResolved { version } if version == "2.0.0"));
    }

    #[tokio::test]
    async fn test_scope_override_selects_release_line() {
        let pager = history(&[
            "release(qa): 2.1.0",
            "feat: Add B.",
            "release(prod): 2.0.0",
            "feat: Add A.",
            "release(qa): 2.0.0",
            "release(prod): 1.0.0",
        ]);
        let mut scanner = ChangelogScanner::new(pager, ScannerOptions::new().with_scope("prod"));

        assert_eq!(scanner.resolve_latest_version().await.unwrap(), "2.0.0");
        let result = scanner.changelog().await.unwrap();
        assert_eq!(descriptions(&result), vec!["2.0.0", "Add A."]);
        assert_eq!(result.release_marker.scope.as_deref(), Some("prod"));
    }

    #[tokio::test]
    async fn test_custom_marker_type() {
        let pager = history(&["deploy(eu): 5.0.0", "fix: Patch B.", "deploy(eu): 4.0.0"]);
        let scanner = ChangelogScanner::new(pager, ScannerOptions::new().with_marker_type("deploy"));

        let result = scanner.changelog().await.unwrap();
        assert_eq!(result.version, "5.0.0");
        assert_eq!(descriptions(&result), vec!["Patch B."]);
    }

    struct FailingHistory;

    #[async_trait]
    impl HistoryPager for FailingHistory {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_page(
            &self,
            _page: u32,
            _per_page: u32,
        ) -> markline_git::Result<Vec<CommitInfo>> {
            Err(HistoryError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_transport_error_forwarded() {
        let mut scanner = ChangelogScanner::new(FailingHistory, ScannerOptions::default());
        let err = scanner.resolve_latest_version().await.unwrap_err();
        assert!(matches!(
            err,
            ChangelogError::History(HistoryError::Api { status: 503, .. })
        ));
    }
}
