//! Conventional Commits parser
//!
//! Parses commit messages following the Conventional Commits specification:
//! https://www.conventionalcommits.org/
//!
//! A message is read line by line through three sections:
//!
//! ```text
//! type[(scope)][!]: description
//! <blank>
//! body (any lines that do not look like a footer)
//! <blank>
//! [BREAKING CHANGE: description]
//! Token: value
//! ```
//!
//! Body and footers are optional, but each one must be preceded by a blank
//! line. A lone `\r` counts as blank, since some hosting providers leave one
//! in front of the footer block.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use markline_core::ParseError;
use markline_git::CommitInfo;
use regex::Regex;
use tracing::trace;

use crate::types::CommitRecord;

/// Header line: `type[(scope)][!]: description`
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>\w+)(?:\((?P<scope>[\w-]+)\))?(?P<breaking>!)?: (?P<description>\b[\w#<> ./\t\\-]{3,}(?:\b|\.))$",
    )
    .expect("Invalid regex")
});

/// Any line that opens the footer block
static FOOTER_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:BREAKING\sCHANGE|\w+(?:-\w+)*):").expect("Invalid regex")
});

/// `BREAKING CHANGE: description`
static BREAKING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^BREAKING\sCHANGE:\s(?P<description>.*(?:\w|\.))$").expect("Invalid regex")
});

/// `Token: value` trailer
static FOOTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+(?:-\w+)*:\s.+$").expect("Invalid regex"));

/// Parser for Conventional Commits messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalParser;

impl ConventionalParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw commit, attaching it as the record's origin
    pub fn parse_commit(&self, commit: &CommitInfo) -> Result<CommitRecord, ParseError> {
        self.parse(&commit.message)
            .map(|record| record.with_origin(commit.clone()))
    }

    /// Parse a commit message.
    ///
    /// The whole message has to follow the grammar; there is no partial
    /// result.
    pub fn parse(&self, message: &str) -> Result<CommitRecord, ParseError> {
        let message = message.strip_suffix('\n').unwrap_or(message);
        if message.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let lines: Vec<&str> = message.split('\n').collect();

        let header = strip_cr(lines[0]);
        let caps = HEADER_REGEX
            .captures(header)
            .ok_or_else(|| ParseError::MalformedHeader {
                header: header.to_string(),
            })?;

        let mut record = CommitRecord::new(
            caps["type"].to_lowercase(),
            caps["description"].to_string(),
        );
        record.scope = caps.name("scope").map(|m| m.as_str().to_lowercase());
        record.breaking = caps.name("breaking").is_some();

        if lines.len() == 1 {
            return Ok(record);
        }

        if !is_blank(lines[1]) {
            return Err(ParseError::MissingSeparator { line: 2 });
        }

        // Body runs until the first footer-shaped line
        let footer_start = lines
            .iter()
            .enumerate()
            .skip(2)
            .find(|(_, line)| FOOTER_START_REGEX.is_match(strip_cr(line)))
            .map(|(index, _)| index);

        let body_end = footer_start.unwrap_or(lines.len());
        record.body = collect_body(&lines[2..body_end]);

        if let Some(start) = footer_start {
            if !is_blank(lines[start - 1]) {
                return Err(ParseError::MissingSeparator { line: start + 1 });
            }
            parse_footers(&lines[start..], start, &mut record)?;
        }

        trace!(commit = %record, "parsed commit message");
        Ok(record)
    }
}

/// Join body lines, dropping blank lines around the text
fn collect_body(lines: &[&str]) -> Option<String> {
    let first = lines.iter().position(|line| !is_blank(line))?;
    let last = lines.iter().rposition(|line| !is_blank(line))?;

    let body = lines[first..=last].join("\n");
    Some(strip_cr(&body).to_string())
}

/// Read the footer block; `offset` is the index of its first line
fn parse_footers(
    lines: &[&str],
    offset: usize,
    record: &mut CommitRecord,
) -> Result<(), ParseError> {
    let mut footers = BTreeMap::new();
    let mut seen_footer = false;
    let mut after_breaking = false;
    let mut gap_after_breaking = false;

    for (index, raw) in lines.iter().enumerate() {
        let line = strip_cr(raw);
        let malformed = || ParseError::MalformedFooter {
            line: offset + index + 1,
            content: line.to_string(),
        };

        if line.trim().is_empty() {
            gap_after_breaking |= after_breaking;
            continue;
        }

        // Blank lines may separate trailers, but not the breaking change from them
        if gap_after_breaking {
            return Err(malformed());
        }
        after_breaking = false;

        if let Some(caps) = BREAKING_REGEX.captures(line) {
            // Only allowed once, as the first footer
            if seen_footer {
                return Err(malformed());
            }
            record.breaking = true;
            record.breaking_description = Some(caps["description"].trim().to_string());
            after_breaking = true;
        } else if FOOTER_REGEX.is_match(line) {
            // Lines that do not split into a token and a value are dropped
            if let Some((token, value)) = line.split_once(':') {
                let (token, value) = (token.trim(), value.trim());
                if !token.is_empty() && !value.is_empty() {
                    footers.insert(token.to_string(), value.to_string());
                }
            }
        } else {
            return Err(malformed());
        }

        seen_footer = true;
    }

    record.footers = footers;
    Ok(())
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn is_blank(line: &str) -> bool {
    strip_cr(line).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parse(message: &str) -> CommitRecord {
        ConventionalParser::new().parse(message).unwrap()
    }

    fn parse_err(message: &str) -> ParseError {
        ConventionalParser::new().parse(message).unwrap_err()
    }

    #[test]
    fn test_parse_simple_feat() {
        let record = parse("feat: Add login button.");

        assert_eq!(record.commit_type, "feat");
        assert!(record.scope.is_none());
        assert_eq!(record.description, "Add login button.");
        assert!(!record.breaking);
        assert!(record.body.is_none());
        assert!(record.footers.is_empty());
    }

    #[test]
    fn test_parse_with_scope_and_body() {
        let record = parse("fix(core): Patch race.\n\nDetails here.");

        assert_eq!(record.commit_type, "fix");
        assert_eq!(record.scope.as_deref(), Some("core"));
        assert_eq!(record.body.as_deref(), Some("Details here."));
    }

    #[test]
    fn test_parse_breaking_marker() {
        let record = parse("feat(api)!: Remove v1 endpoint.");

        assert!(record.breaking);
        assert!(record.breaking_description.is_none());
    }

    #[test]
    fn test_parse_breaking_footer() {
        let record = parse("fix: Fix X.\n\nBody.\n\nBREAKING CHANGE: Y.\nReviewed-by: Alice");

        assert!(record.breaking);
        assert_eq!(record.breaking_description.as_deref(), Some("Y."));
        assert_eq!(record.body.as_deref(), Some("Body."));
        assert_eq!(record.footers.len(), 1);
        assert_eq!(record.footers["Reviewed-by"], "Alice");
    }

    #[test]
    fn test_parse_footers_without_body() {
        let record = parse("chore: Bump deps\n\nRefs: #123\nSigned-off-by: Bob <bob@example.com>");

        assert!(record.body.is_none());
        assert_eq!(record.footers["Refs"], "#123");
        assert_eq!(record.footers["Signed-off-by"], "Bob <bob@example.com>");
    }

    #[test]
    fn test_footer_value_split_on_first_colon() {
        let record = parse("docs: Link wiki\n\nSee-also: https://example.com/wiki");
        assert_eq!(record.footers["See-also"], "https://example.com/wiki");
    }

    #[test]
    fn test_duplicate_footer_keeps_last() {
        let record = parse("fix: Patch race.\n\nRefs: #1\nRefs: #2");
        assert_eq!(record.footers["Refs"], "#2");
    }

    #[test]
    fn test_carriage_return_before_footers() {
        let record = parse("feat: Description\n\nOptional body.\r\n\r\nIssue: CA-000");

        assert_eq!(record.description, "Description");
        assert_eq!(record.body.as_deref(), Some("Optional body."));
        assert_eq!(record.footers.len(), 1);
        assert_eq!(record.footers["Issue"], "CA-000");
    }

    #[test]
    fn test_crlf_header() {
        let record = parse("fix: Patch race.\r\n\r\nDetails here.\r\n");
        assert_eq!(record.description, "Patch race.");
        assert_eq!(record.body.as_deref(), Some("Details here."));
    }

    #[test]
    fn test_multi_paragraph_body() {
        let record = parse("feat: Add export\n\nFirst paragraph.\n\nSecond paragraph.\n");
        assert_eq!(
            record.body.as_deref(),
            Some("First paragraph.\n\nSecond paragraph.")
        );
    }

    #[test]
    fn test_type_and_scope_lowercased() {
        let record = parse("Release(PROD): 2.0.0");

        assert_eq!(record.commit_type, "release");
        assert_eq!(record.scope.as_deref(), Some("prod"));
        assert_eq!(record.description, "2.0.0");
    }

    #[test]
    fn test_trailing_newline_consumed() {
        assert_eq!(parse("feat: Add login button.\n"), parse("feat: Add login button."));
    }

    #[test]
    fn test_scope_with_hyphen() {
        let record = parse("release(pre-prod): 1.4.0");
        assert_eq!(record.scope.as_deref(), Some("pre-prod"));
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(parse_err(""), ParseError::Empty);
        assert_eq!(parse_err("\n"), ParseError::Empty);
    }

    #[test]
    fn test_malformed_headers() {
        for message in [
            "Just a regular commit message",
            "Merge pull request #12 from acme/feature",
            "feat:no space",
            "feat:  two spaces",
            "feat: ab",
            "fix: X.",
            "feat(): empty scope",
            "feat(a b): space in scope",
            "feat: trailing space ",
            "feat: ends with bang!",
        ] {
            assert!(
                matches!(parse_err(message), ParseError::MalformedHeader { .. }),
                "{message:?} should not parse"
            );
        }
    }

    #[test]
    fn test_missing_blank_after_header() {
        assert_eq!(
            parse_err("feat: Add login button.\nBody right away."),
            ParseError::MissingSeparator { line: 2 }
        );
    }

    #[test]
    fn test_missing_blank_before_footers() {
        assert_eq!(
            parse_err("fix: Patch race.\n\nBody.\nRefs: #1"),
            ParseError::MissingSeparator { line: 4 }
        );
    }

    #[test]
    fn test_text_after_footers_is_malformed() {
        let err = parse_err("fix: Patch race.\n\nRefs: #1\nnot a footer");
        assert_eq!(
            err,
            ParseError::MalformedFooter {
                line: 4,
                content: "not a footer".to_string()
            }
        );
    }

    #[test]
    fn test_breaking_change_must_come_first() {
        let err = parse_err("fix: Patch race.\n\nRefs: #1\nBREAKING CHANGE: Y.");
        assert!(matches!(err, ParseError::MalformedFooter { line: 4, .. }));

        let err = parse_err("fix: Patch race.\n\nBREAKING CHANGE: A.\nBREAKING CHANGE: B.");
        assert!(matches!(err, ParseError::MalformedFooter { line: 4, .. }));
    }

    #[test]
    fn test_blank_line_after_breaking_change_is_malformed() {
        let err = parse_err("fix: Patch race.\n\nBREAKING CHANGE: Gone.\n\nRefs: #1");
        assert_eq!(
            err,
            ParseError::MalformedFooter {
                line: 5,
                content: "Refs: #1".to_string()
            }
        );
    }

    #[test]
    fn test_blank_lines_between_footers() {
        let record = parse("fix: Patch race.\n\nRefs: #1\n\nReviewed-by: Alice\n");
        assert_eq!(record.footers.len(), 2);
        assert_eq!(record.footers["Reviewed-by"], "Alice");

        let record = parse("fix: Patch race.\n\nBREAKING CHANGE: Gone.\nRefs: #1\n\nAcked-by: Bob");
        assert_eq!(record.breaking_description.as_deref(), Some("Gone."));
        assert_eq!(record.footers.len(), 2);
    }

    #[test]
    fn test_parse_commit_attaches_origin() {
        let info = CommitInfo::new(
            "abc1234567890",
            "release(prod): 2.0.0\n\nSpring release.",
            "Test Author",
            "test@example.com",
            Utc::now(),
        );

        let record = ConventionalParser::new().parse_commit(&info).unwrap();
        assert_eq!(record.sha(), Some("abc1234567890"));
        assert_eq!(record.body.as_deref(), Some("Spring release."));
    }

    #[test]
    fn test_idempotent() {
        let message = "fix(core)!: Patch race.\n\nDetails.\n\nRefs: #9";
        assert_eq!(parse(message), parse(message));
    }
}
