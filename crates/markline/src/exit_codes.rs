//! Exit codes for the CLI

use markline_core::{ChangelogError, ConfigError, HistoryError, MarklineError};

/// Success
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// History provider or transport error
pub const HISTORY_ERROR: i32 = 3;

/// The requested release is not in history
pub const RELEASE_NOT_FOUND: i32 = 4;

/// Pick the exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<MarklineError>() {
        return match err {
            MarklineError::Config(_) => CONFIG_ERROR,
            MarklineError::History(_) => HISTORY_ERROR,
            MarklineError::Changelog(err) => for_changelog_error(err),
            _ => ERROR,
        };
    }
    if let Some(err) = err.downcast_ref::<ChangelogError>() {
        return for_changelog_error(err);
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    if err.downcast_ref::<HistoryError>().is_some() {
        return HISTORY_ERROR;
    }
    ERROR
}

fn for_changelog_error(err: &ChangelogError) -> i32 {
    if err.is_release_missing() {
        RELEASE_NOT_FOUND
    } else {
        HISTORY_ERROR
    }
}
