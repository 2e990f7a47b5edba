//! In-memory history provider
//!
//! Serves a fixed, newest-first list of commits. Useful for tests and for
//! callers that already hold the history they want to scan.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tracing::trace;

use crate::pager::{page_offset, HistoryPager, Result};
use crate::types::CommitInfo;

/// History held in a vector, newest first
#[derive(Debug, Default)]
pub struct MemoryHistory {
    commits: Vec<CommitInfo>,
    requests: AtomicU32,
}

impl MemoryHistory {
    /// Create a provider over commits ordered newest first
    pub fn new(commits: Vec<CommitInfo>) -> Self {
        Self {
            commits,
            requests: AtomicU32::new(0),
        }
    }

    /// Number of pages requested so far, including the final empty one
    pub fn requests(&self) -> u32 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HistoryPager for MemoryHistory {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let page_commits: Vec<CommitInfo> = self
            .commits
            .iter()
            .skip(page_offset(page, per_page))
            .take(per_page as usize)
            .cloned()
            .collect();

        trace!(page, count = page_commits.len(), "served memory page");
        Ok(page_commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn commits(count: usize) -> Vec<CommitInfo> {
        (0..count)
            .map(|i| {
                CommitInfo::new(
                    format!("{i:040}"),
                    format!("chore: commit number {i}"),
                    "Test",
                    "test@example.com",
                    Utc::now(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_pages() {
        let history = MemoryHistory::new(commits(5));

        let first = history.fetch_page(1, 2).await.unwrap();
        let last = history.fetch_page(3, 2).await.unwrap();
        let past_end = history.fetch_page(4, 2).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].message, "chore: commit number 0");
        assert_eq!(last.len(), 1);
        assert!(past_end.is_empty());
        assert_eq!(history.requests(), 3);
    }
}
