//! Version command

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use crate::cli::output::{header, key_value, version_style};
use crate::cli::{build_scanner, Cli, OutputFormat, SourceArgs};

/// Resolve a release and print its version
#[derive(Debug, Args)]
pub struct VersionCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Look up this version instead of the latest release
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    description: Option<String>,
    scope: Option<String>,
    sha: Option<String>,
    url: Option<String>,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.for_version, "executing version command");
        let config = cli.load_config(&self.source)?;

        let mut scanner = build_scanner(&config)?;
        match &self.for_version {
            Some(version) => scanner.resolve_version(version).await?,
            None => {
                scanner.resolve_latest_version().await?;
            }
        }

        let Some(marker) = scanner.release_marker() else {
            anyhow::bail!("no release was resolved");
        };

        let info = VersionInfo {
            version: marker.description.clone(),
            description: marker.body.clone(),
            scope: marker.scope.clone(),
            sha: marker.sha().map(str::to_string),
            url: marker.origin.as_ref().and_then(|o| o.url.clone()),
        };

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
            OutputFormat::Text if cli.quiet => println!("{}", info.version),
            OutputFormat::Text => {
                println!("{}", header("Release"));
                println!(
                    "{}",
                    key_value("Version", &version_style().apply_to(&info.version).to_string())
                );
                if let Some(scope) = &info.scope {
                    println!("{}", key_value("Scope", scope));
                }
                if let Some(sha) = &info.sha {
                    println!("{}", key_value("Commit", &style(sha).yellow().to_string()));
                }
                if let Some(description) = &info.description {
                    println!();
                    println!("{}", description);
                }
            }
        }

        Ok(())
    }
}
