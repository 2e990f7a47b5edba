//! Default configuration values

use super::types::{Config, SectionConfig};

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "markline.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "markline.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".markline.yaml";

/// Branch read from GitHub when none is configured
pub const DEFAULT_BRANCH: &str = "main";

/// Commit type marking a release
pub const DEFAULT_MARKER_TYPE: &str = "release";

/// Commits requested per history page
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Largest page the GitHub API serves
pub const MAX_PAGE_SIZE: u32 = 100;

/// GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".markline.toml",
    ]
}

/// Default changelog sections
pub fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("feat", "\u{2728} Features"),
        SectionConfig::new("fix", "\u{1f41b} Fixes"),
    ]
}

/// Generate default configuration YAML
pub fn default_config_yaml() -> String {
    let config = Config::default();
    serde_yaml::to_string(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# markline configuration

source:
  kind: github
  owner: my-org
  repository: my-repo
  branch: main
  token_env: GITHUB_TOKEN

scan:
  marker_type: release
  page_size: 30
  # scope: prod

changelog:
  format: markdown
  include_bodies: true
  sections:
    - type: feat
      heading: "✨ Features"
    - type: fix
      heading: "🐛 Fixes"
"#;
