//! Changelog command

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use markline_changelog::{ChangelogFormatter, FormatterRegistry};
use markline_core::ConfigError;

use crate::cli::output::{self, path_style};
use crate::cli::{build_scanner, Cli, OutputFormat, SourceArgs};

/// Generate the changelog of a release
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Version to generate changelog for (default: latest release)
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Renderer to use (markdown, slack)
    #[arg(short, long)]
    pub renderer: Option<String>,

    /// Output file (default: print to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.for_version, renderer = ?self.renderer, "executing changelog command");
        let config = cli.load_config(&self.source)?;

        let registry = FormatterRegistry::new();
        let renderer = self.renderer.as_deref().unwrap_or(&config.changelog.format);
        let formatter = registry.get(renderer).ok_or_else(|| ConfigError::InvalidValue {
            field: "renderer".to_string(),
            message: format!(
                "unknown renderer '{}', expected one of: {}",
                renderer,
                registry.names().join(", ")
            ),
        })?;

        let mut scanner = build_scanner(&config)?;
        if let Some(version) = &self.for_version {
            scanner.resolve_version(version).await?;
        }
        let result = scanner.changelog().await?;

        let rendered = match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&result)?,
            OutputFormat::Text => formatter.format(&result, &config.changelog),
        };

        match self.output.as_ref().or(config.changelog.output.as_ref()) {
            Some(path) => {
                std::fs::write(path, &rendered)?;
                if !cli.quiet {
                    output::success(&format!(
                        "Changelog for {} written to {}",
                        result.version,
                        path_style().apply_to(path.display())
                    ));
                }
            }
            None => {
                print!("{}", rendered);
                if !rendered.ends_with('\n') {
                    println!();
                }
            }
        }

        if result.stats.malformed > 0 && !cli.quiet {
            output::warning(&format!(
                "{} commit(s) skipped: not conventional commits",
                result.stats.malformed
            ));
        }

        Ok(())
    }
}
