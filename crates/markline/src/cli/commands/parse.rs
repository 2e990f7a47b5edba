//! Parse command

use std::io::Read;

use clap::Args;
use console::style;
use tracing::info;

use markline_changelog::ConventionalParser;

use crate::cli::output::{header, key_value};
use crate::cli::{Cli, OutputFormat};

/// Parse a single commit message
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// Commit message, or `-` to read it from stdin
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

impl ParseCommand {
    /// Execute the parse command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let message = if self.message == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            self.message.clone()
        };
        info!(len = message.len(), "executing parse command");

        let record = ConventionalParser::new().parse(&message)?;

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
            OutputFormat::Text => {
                println!("{}", header("Conventional commit"));
                println!("{}", key_value("Type", &record.commit_type));
                if let Some(scope) = &record.scope {
                    println!("{}", key_value("Scope", scope));
                }
                println!("{}", key_value("Description", &record.description));
                if record.breaking {
                    let breaking = record
                        .breaking_description
                        .as_deref()
                        .unwrap_or("yes");
                    println!("{}", key_value("Breaking", &style(breaking).red().to_string()));
                }
                if let Some(body) = &record.body {
                    println!("{}", key_value("Body", body));
                }
                for (token, value) in &record.footers {
                    println!("{}", key_value(token, value));
                }
            }
        }

        Ok(())
    }
}
