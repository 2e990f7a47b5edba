//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use markline_changelog::{ChangelogScanner, ScannerOptions};
use markline_core::config::{find_config, read_config, validate_config};
use markline_core::{Config, ConfigError, SourceKind};
use markline_git::{GitHubConfig, GitHubHistory, GitRepo, HistoryPager, LocalHistory};

use commands::{ChangelogCommand, InitCommand, ParseCommand, VersionCommand};

/// Markline - release changelogs from conventional commit history
#[derive(Debug, Parser)]
#[command(name = "markline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search from the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new markline configuration
    Init(InitCommand),

    /// Resolve a release and print its version
    Version(VersionCommand),

    /// Generate the changelog of a release
    Changelog(ChangelogCommand),

    /// Parse a single commit message
    Parse(ParseCommand),
}

/// Where to read history from; overrides the `source` section of the config
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// GitHub repository
    #[arg(long, value_name = "OWNER/REPO", conflicts_with = "local")]
    pub github: Option<String>,

    /// Branch to read (GitHub) or revision to start from (local, default HEAD)
    #[arg(long)]
    pub branch: Option<String>,

    /// Local git repository
    #[arg(long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// Only resolve releases of this scope
    #[arg(long)]
    pub scope: Option<String>,
}

impl SourceArgs {
    /// Apply the flags on top of a configuration
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(github) = &self.github {
            let (owner, repository) = github
                .split_once('/')
                .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "--github".to_string(),
                    message: format!("expected OWNER/REPO, got '{}'", github),
                })?;
            config.source.kind = SourceKind::Github;
            config.source.owner = Some(owner.to_string());
            config.source.repository = Some(repository.to_string());
        }

        if let Some(path) = &self.local {
            config.source.kind = SourceKind::Local;
            config.source.path = Some(path.clone());
        }

        if let Some(branch) = &self.branch {
            config.source.branch = Some(branch.clone());
        }

        if let Some(scope) = &self.scope {
            config.scan.scope = Some(scope.clone());
        }

        Ok(())
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Version(ref cmd) => cmd.execute(&self),
            Commands::Changelog(ref cmd) => cmd.execute(&self),
            Commands::Parse(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration, apply source flags and validate the result
    pub fn load_config(&self, source: &SourceArgs) -> anyhow::Result<Config> {
        let cwd = std::env::current_dir()?;

        let mut config = match self.config_path(&cwd) {
            Some(path) => read_config(&path)?,
            None => {
                debug!("no config file, using defaults");
                Config::default()
            }
        };

        source.apply(&mut config)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn config_path(&self, cwd: &Path) -> Option<PathBuf> {
        match &self.config {
            Some(path) if path.is_absolute() => Some(path.clone()),
            Some(path) => Some(cwd.join(path)),
            None => find_config(cwd),
        }
    }
}

/// Create the history provider named by the configuration
pub fn build_pager(config: &Config) -> anyhow::Result<Box<dyn HistoryPager>> {
    let source = &config.source;

    match source.kind {
        SourceKind::Github => {
            let github = GitHubConfig::from_source(source)
                .ok_or_else(|| ConfigError::MissingField("source.repository".to_string()))?;
            info!(owner = %github.owner, repository = %github.repository, "reading history from GitHub");
            Ok(Box::new(GitHubHistory::new(github)?))
        }
        SourceKind::Local => {
            let path = match &source.path {
                Some(path) => path.clone(),
                None => std::env::current_dir()?,
            };
            let repo = GitRepo::discover(&path)?;
            info!(path = %repo.path().display(), "reading history from local repository");

            let history = LocalHistory::new(repo);
            Ok(Box::new(match local_revision(source) {
                Some(revision) => history.with_revision(revision),
                None => history,
            }))
        }
    }
}

/// A local source starts from HEAD unless a branch is set
fn local_revision(source: &markline_core::SourceConfig) -> Option<String> {
    source.branch.clone()
}

/// Create a scanner for the configured source
pub fn build_scanner(config: &Config) -> anyhow::Result<ChangelogScanner<Box<dyn HistoryPager>>> {
    let pager = build_pager(config)?;
    Ok(ChangelogScanner::new(pager, ScannerOptions::from(&config.scan)))
}
