//! Slack Block Kit formatter
//!
//! Produces a message payload (`text` fallback plus `blocks`) ready to be
//! posted with `chat.postMessage` or an incoming webhook.

use markline_core::ChangelogConfig;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::ChangelogFormatter;
use crate::types::ChangelogResult;

/// A text object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackText {
    /// `plain_text` or `mrkdwn`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Content
    pub text: String,
    /// Render emoji shortcodes (plain text only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<bool>,
}

impl SlackText {
    /// Plain text object
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "plain_text",
            text: text.into(),
            emoji: None,
        }
    }

    /// Markdown text object
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn",
            text: text.into(),
            emoji: None,
        }
    }
}

/// Layout blocks used by the changelog message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlackBlock {
    Header { text: SlackText },
    Context { elements: Vec<SlackText> },
    Section { text: SlackText },
    Divider,
}

/// Message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    /// Fallback for notifications
    pub text: String,
    /// Rich content
    pub blocks: Vec<SlackBlock>,
}

/// Slack changelog formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct SlackFormatter;

impl SlackFormatter {
    /// Create a new Slack formatter
    pub fn new() -> Self {
        Self
    }

    /// Build the message payload
    pub fn message(&self, result: &ChangelogResult, config: &ChangelogConfig) -> SlackMessage {
        let mut blocks = vec![SlackBlock::Header {
            text: SlackText {
                emoji: Some(true),
                ..SlackText::plain(":rocket: New version has been released!")
            },
        }];

        if !result.version_description.is_empty() {
            blocks.push(SlackBlock::Context {
                elements: vec![SlackText::mrkdwn(result.version_description.as_str())],
            });
        }

        blocks.push(SlackBlock::Section {
            text: SlackText::mrkdwn(format!("Changelist for version *{}*", result.version)),
        });

        for section in &config.sections {
            blocks.push(SlackBlock::Divider);
            blocks.push(SlackBlock::Section {
                text: SlackText::mrkdwn(section.heading.as_str()),
            });

            for commit in result.commits_of_type(&section.commit_type) {
                blocks.push(SlackBlock::Section {
                    text: SlackText::plain(commit.description.as_str()),
                });

                if config.include_bodies {
                    if let Some(body) = commit.body.as_deref().filter(|b| !b.is_empty()) {
                        blocks.push(SlackBlock::Context {
                            elements: vec![SlackText::plain(body)],
                        });
                    }
                }
            }
        }

        SlackMessage {
            text: format!("A new version {} has been released.", result.version),
            blocks,
        }
    }
}

impl ChangelogFormatter for SlackFormatter {
    fn name(&self) -> &'static str {
        "slack"
    }

    #[instrument(skip(self, result, config), fields(version = %result.version, commit_count = result.commits.len()))]
    fn format(&self, result: &ChangelogResult, config: &ChangelogConfig) -> String {
        let message = self.message(result, config);
        debug!(blocks = message.blocks.len(), "slack message built");

        match serde_json::to_string_pretty(&message) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize slack message");
                String::new()
            }
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
