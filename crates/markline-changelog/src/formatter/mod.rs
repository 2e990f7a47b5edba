//! Changelog formatters

mod markdown;
mod registry;
mod slack;

pub use markdown::MarkdownFormatter;
pub use registry::FormatterRegistry;
pub use slack::{SlackBlock, SlackFormatter, SlackMessage, SlackText};

use markline_core::ChangelogConfig;

use crate::types::ChangelogResult;

/// Trait for changelog formatters.
///
/// Sections are rendered in the order of `config.sections`; commits whose type
/// has no section are left out of the output.
pub trait ChangelogFormatter: Send + Sync {
    /// Name used to select the formatter
    fn name(&self) -> &'static str;

    /// Format a release changelog to string
    fn format(&self, result: &ChangelogResult, config: &ChangelogConfig) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}
