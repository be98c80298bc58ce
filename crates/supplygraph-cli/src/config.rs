//! Configuration management for the Supplygraph CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use supplygraph::runtime::analytics::AnalyticsSettings;
use supplygraph::EngineConfig;

pub const CONFIG_FILE: &str = "supplygraph.toml";

/// Project configuration (`supplygraph.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset file, relative to the config file's directory.
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("network.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            engine: EngineConfig::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// A config plus the directory it was found in.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub base_dir: PathBuf,
}

impl Loaded {
    /// Dataset path resolved against the config's directory.
    pub fn dataset_path(&self) -> PathBuf {
        if self.config.dataset.path.is_absolute() {
            self.config.dataset.path.clone()
        } else {
            self.base_dir.join(&self.config.dataset.path)
        }
    }
}

impl Config {
    /// Load from an explicit path, or discover supplygraph.toml in the
    /// current or parent directories. Falls back to defaults rooted at the
    /// current directory.
    pub fn load(explicit: Option<&Path>) -> Result<Loaded> {
        let found = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(),
        };
        match found {
            Some(path) => {
                let config = Self::read(&path)?;
                let base_dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(Loaded { config, base_dir })
            }
            None => Ok(Loaded {
                config: Config::default(),
                base_dir: std::env::current_dir().context("Failed to read current directory")?,
            }),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Engine settings with the analytics thresholds attached.
    pub fn engine_config(&self) -> EngineConfig {
        self.engine.clone().with_analytics(self.analytics)
    }
}

/// Find supplygraph.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplygraph::agents::agent::AgentKind;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert!(text.contains("context_window = 10"));
        assert!(text.contains("default_agent = \"simple_reflex\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            "[engine]\ndefault_agent = \"goal_based\"\n\n[analytics]\noverstock_factor = 4.0\n",
        )
        .unwrap();
        assert_eq!(parsed.engine.default_agent, AgentKind::GoalBased);
        assert_eq!(parsed.engine.context_window, 10);
        assert_eq!(parsed.analytics.overstock_factor, 4.0);
        assert_eq!(parsed.analytics.understock_factor, 0.5);
        assert_eq!(parsed.dataset.path, PathBuf::from("network.json"));
        assert_eq!(parsed.engine_config().analytics.overstock_factor, 4.0);
    }

    #[test]
    fn explicit_path_resolves_dataset_relative_to_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::default().save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.dataset_path(), dir.path().join("network.json"));
    }
}
