use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::util::{display_name, expand_home};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "gitpulse=debug",
            LogLevel::Info => "gitpulse=info",
            LogLevel::Warn => "gitpulse=warn",
            LogLevel::Error => "gitpulse=error",
        }
    }
}

fn default_theme() -> String {
    "dracula".to_string()
}

fn default_grouped() -> bool {
    true
}

fn default_refresh_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Repository paths to monitor, `~/` allowed
    #[serde(default)]
    pub repos: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Start with rows grouped by sync state
    #[serde(default = "default_grouped")]
    pub grouped: bool,
    /// Periodic status refresh; 0 disables it
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            theme: default_theme(),
            grouped: default_grouped(),
            refresh_secs: default_refresh_secs(),
            log_level: LogLevel::default(),
        }
    }
}

/// A monitored repository after path expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub path: PathBuf,
    pub name: String,
}

impl Config {
    /// Load the config file, `None` when it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(Some(config))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    pub fn config_dir() -> Result<PathBuf> {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(xdg).join("gitpulse"));
        }
        let dir = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".config")
            .join("gitpulse");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn repo_configs(&self) -> Vec<RepoConfig> {
        self.repos
            .iter()
            .map(|raw| {
                let path = expand_home(raw);
                let name = display_name(&path);
                RepoConfig { path, name }
            })
            .collect()
    }

    pub fn example() -> &'static str {
        r#"# gitpulse configuration

# Color theme: dracula, nord, catppuccin, gruvbox, tokyonight, mono, jrpg-dark, jrpg-light
theme = "dracula"

# Seconds between automatic status refreshes (0 disables)
refresh_secs = 60

# Repository paths to monitor
repos = [
    "~/Developer/project1",
    "~/Developer/project2",
    "~/work/important-repo",
]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_parses() {
        let config: Config = toml::from_str(Config::example()).unwrap();
        assert_eq!(config.repos.len(), 3);
        assert_eq!(config.theme, "dracula");
        assert_eq!(config.refresh_secs, 60);
        assert!(config.grouped);
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: Config = toml::from_str("repos = [\"/srv/a\"]").unwrap();
        assert_eq!(config.theme, "dracula");
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.grouped);
    }

    #[test]
    fn test_repo_configs_use_last_component() {
        let config = Config {
            repos: vec!["/srv/code/alpha".into(), "/srv/code/beta/".into()],
            ..Default::default()
        };
        let repos = config.repo_configs();
        assert_eq!(repos[0].name, "alpha");
        assert_eq!(repos[1].name, "beta");
        assert_eq!(repos[0].path, PathBuf::from("/srv/code/alpha"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            repos: vec!["~/src/one".into()],
            theme: "nord".into(),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "repos = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
