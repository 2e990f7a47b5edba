//! Markline Core - shared types for release changelog extraction
//!
//! This crate provides the error taxonomy and the configuration layer used by
//! the history providers, the changelog scanner and the CLI.

pub mod config;
pub mod error;

pub use config::{ChangelogConfig, Config, ScanConfig, SectionConfig, SourceConfig, SourceKind};
pub use error::{ChangelogError, ConfigError, HistoryError, MarklineError, ParseError, Result};
