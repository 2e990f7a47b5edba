//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = read_config(path)?;
    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Read configuration from a file without validating it.
///
/// Lets callers apply overrides before calling [`validate_config`].
pub fn read_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }
    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// Each directory level is checked for `<dir>/<name>` and then
/// `<dir>/.github/<name>`; the first match wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "no usable config found, using defaults");
            (Config::default(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("markline.yaml");
        std::fs::write(&config_path, "scan:\n  marker_type: release\n").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join("markline.toml");
        std::fs::write(&config_path, "[scan]\npage_size = 50\n").unwrap();

        let found = find_config(temp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_walks_parents() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("markline.yaml");
        std::fs::write(&config_path, "scan:\n  page_size: 10\n").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config(&nested);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("markline.toml");
        std::fs::write(
            &config_path,
            "[source]\nkind = \"local\"\nbranch = \"develop\"\n\n[scan]\nscope = \"prod\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.source.branch.as_deref(), Some("develop"));
        assert_eq!(config.scan.scope.as_deref(), Some("prod"));
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("markline.yaml");
        std::fs::write(
            &config_path,
            "source:\n  kind: local\nscan:\n  page_size: 0\n",
        )
        .unwrap();

        assert!(load_config(&config_path).is_err());
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path());
        assert!(path.is_none());
        assert_eq!(config.scan.marker_type, "release");
    }

    #[test]
    fn test_read_config_skips_validation() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("markline.yaml");
        // GitHub source without owner/repository is filled in later by the CLI
        std::fs::write(&config_path, "scan:\n  scope: prod\n").unwrap();

        assert!(load_config(&config_path).is_err());
        let config = read_config(&config_path).unwrap();
        assert_eq!(config.scan.scope.as_deref(), Some("prod"));
    }

    #[test]
    fn test_read_config_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_config(&temp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(
            err,
            crate::MarklineError::Config(ConfigError::NotFound(_))
        ));
    }
}
