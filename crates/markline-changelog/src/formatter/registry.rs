//! Formatter registry

use std::sync::Arc;

use super::{ChangelogFormatter, MarkdownFormatter, SlackFormatter};

/// Registry of available changelog formatters
pub struct FormatterRegistry {
    formatters: Vec<Arc<dyn ChangelogFormatter>>,
}

impl FormatterRegistry {
    /// Create a new registry with all built-in formatters
    pub fn new() -> Self {
        Self {
            formatters: vec![Arc::new(MarkdownFormatter::new()), Arc::new(SlackFormatter::new())],
        }
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    /// Register a formatter
    pub fn register<F: ChangelogFormatter + 'static>(&mut self, formatter: F) {
        self.formatters.push(Arc::new(formatter));
    }

    /// Get formatter by name or file extension
    pub fn get(&self, key: &str) -> Option<Arc<dyn ChangelogFormatter>> {
        let key = key.trim_start_matches('.').to_lowercase();
        self.formatters
            .iter()
            .find(|f| f.name() == key)
            .or_else(|| self.formatters.iter().find(|f| f.extension() == key))
            .cloned()
    }

    /// Get all registered formatters
    pub fn all(&self) -> &[Arc<dyn ChangelogFormatter>] {
        &self.formatters
    }

    /// Names of all registered formatters
    pub fn names(&self) -> Vec<&'static str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
