//! Configuration validation

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::defaults::MAX_PAGE_SIZE;
use super::types::{Config, SourceKind};

/// Commit types are one or more word characters, as in the header grammar
static COMMIT_TYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("Invalid regex"));

/// Renderer names understood by the changelog crate
pub const KNOWN_FORMATS: &[&str] = &["markdown", "md", "slack"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_source(config)?;
    validate_scan(config)?;
    validate_changelog(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_source(config: &Config) -> Result<()> {
    let source = &config.source;

    if source.branch.as_deref().is_some_and(str::is_empty) {
        return Err(invalid("source.branch", "branch cannot be empty").into());
    }

    if source.kind == SourceKind::Github {
        if source.owner.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("source.owner".to_string()).into());
        }
        if source.repository.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField("source.repository".to_string()).into());
        }
        if let Err(e) = url::Url::parse(&source.api_url) {
            return Err(invalid("source.api_url", format!("not a valid URL: {e}")).into());
        }
    }

    Ok(())
}

fn validate_scan(config: &Config) -> Result<()> {
    let scan = &config.scan;

    if !COMMIT_TYPE_REGEX.is_match(&scan.marker_type) {
        return Err(invalid("scan.marker_type", "must be one or more word characters").into());
    }

    if scan.page_size == 0 || scan.page_size > MAX_PAGE_SIZE {
        return Err(invalid(
            "scan.page_size",
            format!("must be between 1 and {MAX_PAGE_SIZE}"),
        )
        .into());
    }

    if scan.scope.as_deref().is_some_and(str::is_empty) {
        return Err(invalid("scan.scope", "scope cannot be empty when set").into());
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    let changelog = &config.changelog;

    if !KNOWN_FORMATS.contains(&changelog.format.as_str()) {
        return Err(invalid(
            "changelog.format",
            format!("must be one of: {}", KNOWN_FORMATS.join(", ")),
        )
        .into());
    }

    let mut seen = HashSet::new();
    for (i, section) in changelog.sections.iter().enumerate() {
        if !COMMIT_TYPE_REGEX.is_match(&section.commit_type) {
            return Err(invalid(
                format!("changelog.sections[{i}].type"),
                "must be one or more word characters",
            )
            .into());
        }
        if !seen.insert(section.commit_type.to_lowercase()) {
            return Err(invalid(
                format!("changelog.sections[{i}].type"),
                format!("duplicate section for type '{}'", section.commit_type),
            )
            .into());
        }
    }

    Ok(())
}
