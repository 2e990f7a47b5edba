//! Init command

use clap::Args;
use console::style;
use tracing::info;

use markline_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use markline_core::Config;

use crate::cli::output::{self, path_style};
use crate::cli::Cli;

/// Initialize a new markline configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write TOML instead of YAML
    #[arg(long)]
    pub toml: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;

        let config_path = match &cli.config {
            Some(path) => cwd.join(path),
            None if self.toml => cwd.join(DEFAULT_CONFIG_TOML),
            None => cwd.join(DEFAULT_CONFIG_YAML),
        };

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = render_config(self.toml)?;
        std::fs::write(&config_path, &content)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                path_style().apply_to(config_path.display())
            ));
            println!();
            println!("Next steps:");
            println!("  1. Set the repository owner and name in {}", config_path.display());
            println!(
                "  2. Mark releases with commits like {}",
                style("release(prod): 1.0.0").cyan()
            );
            println!("  3. Run {} to render the latest release", style("markline changelog").cyan());
        }

        Ok(())
    }
}

/// Default configuration as YAML (commented template) or TOML
fn render_config(toml: bool) -> anyhow::Result<String> {
    if !toml {
        return Ok(DEFAULT_CONFIG_TEMPLATE.to_string());
    }

    let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
    Ok(toml::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_yaml() {
        let content = render_config(false).unwrap();
        let config: Config = serde_yaml::from_str(&content).unwrap();
        assert_eq!(config.scan.marker_type, "release");
    }

    #[test]
    fn test_render_toml_roundtrips() {
        let content = render_config(true).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.source.owner.as_deref(), Some("my-org"));
        assert_eq!(config.changelog.sections.len(), 2);
    }
}
