//! Markline Changelog - release changelogs from conventional commit history
//!
//! This crate parses Conventional Commits messages, finds the commits that
//! belong to a release by scanning history back to the previous release
//! marker, and renders the result.

pub mod formatter;
pub mod parser;
pub mod scanner;
pub mod types;

pub use formatter::{ChangelogFormatter, FormatterRegistry, MarkdownFormatter, SlackFormatter};
pub use parser::ConventionalParser;
pub use scanner::{ChangelogScanner, ScannerOptions};
pub use types::{ChangelogResult, CommitRecord, ScanStats};
