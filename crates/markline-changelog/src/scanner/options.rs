//! Scanner options

use markline_core::config::{DEFAULT_MARKER_TYPE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use markline_core::ScanConfig;

/// Settings fixed for the lifetime of a scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerOptions {
    /// Commit type that marks a release
    pub marker_type: String,
    /// Commits requested per page
    pub page_size: u32,
    /// Only resolve releases of this scope
    pub scope: Option<String>,
}

impl ScannerOptions {
    /// Options with the default marker type and page size
    pub fn new() -> Self {
        Self {
            marker_type: DEFAULT_MARKER_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            scope: None,
        }
    }

    /// Set the marker type (lowercased to match parsed records)
    pub fn with_marker_type(mut self, marker_type: impl Into<String>) -> Self {
        self.marker_type = marker_type.into().to_lowercase();
        self
    }

    /// Set the page size, clamped to `1..=100`
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Restrict resolution to one release line
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into().to_lowercase());
        self
    }
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ScanConfig> for ScannerOptions {
    fn from(config: &ScanConfig) -> Self {
        let options = Self::new()
            .with_marker_type(config.marker_type.as_str())
            .with_page_size(config.page_size);

        match &config.scope {
            Some(scope) => options.with_scope(scope.as_str()),
            None => options,
        }
    }
}
