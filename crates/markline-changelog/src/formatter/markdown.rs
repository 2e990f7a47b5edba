//! Markdown changelog formatter

use markline_core::ChangelogConfig;
use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::ChangelogResult;

/// Markdown changelog formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    #[instrument(skip(self, result, config), fields(version = %result.version, commit_count = result.commits.len()))]
    fn format(&self, result: &ChangelogResult, config: &ChangelogConfig) -> String {
        let mut output = String::new();

        output.push_str(&format!("# \u{1f680} Version {}\n", result.version));
        if !result.version_description.is_empty() {
            output.push_str(&format!("*{}*\n", result.version_description));
        }

        for section in &config.sections {
            output.push('\n');
            output.push_str(&format!("## {}\n", section.heading));

            for commit in result.commits_of_type(&section.commit_type) {
                output.push_str(&format!("- **{}**\n", commit.description));

                if config.include_bodies {
                    if let Some(body) = commit.body.as_deref().filter(|b| !b.is_empty()) {
                        output.push_str(&format!("\t- _{}_\n", body));
                    }
                }
            }
        }

        debug!(output_len = output.len(), "markdown changelog formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
