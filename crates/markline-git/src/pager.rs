//! History pager trait

use markline_core::HistoryError;

use crate::types::CommitInfo;

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Supplies commit history in pages, newest first.
///
/// Pages are numbered from 1. An empty page means history is exhausted.
/// Implementations own their transport and its retry policy; errors are
/// handed to the caller unchanged.
#[async_trait::async_trait]
pub trait HistoryPager: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Fetch one page of at most `per_page` commits
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>>;
}

#[async_trait::async_trait]
impl<P: HistoryPager + ?Sized> HistoryPager for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>> {
        (**self).fetch_page(page, per_page).await
    }
}

#[async_trait::async_trait]
impl<P: HistoryPager + ?Sized> HistoryPager for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<CommitInfo>> {
        (**self).fetch_page(page, per_page).await
    }
}

/// Offset of the first commit of a 1-based page
pub(crate) fn page_offset(page: u32, per_page: u32) -> usize {
    (page.max(1) as usize - 1) * per_page as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 30), 0);
        assert_eq!(page_offset(2, 30), 30);
        assert_eq!(page_offset(0, 30), 0);
    }
}
