//! CLI command implementations.

pub mod analytics;
pub mod export;
pub mod init;
pub mod inventory;
pub mod network;
pub mod path;
pub mod query;
pub mod rank;
pub mod validate;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use supplygraph::SupplyChainEngine;

use crate::config::{Config, Loaded};

/// Where to find the config and dataset, from the global flags.
pub struct Source {
    pub config: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
}

impl Source {
    pub fn load_config(&self) -> Result<Loaded> {
        Config::load(self.config.as_deref())
    }

    /// Dataset path: the flag wins over the config.
    pub fn dataset_path(&self, loaded: &Loaded) -> PathBuf {
        self.dataset.clone().unwrap_or_else(|| loaded.dataset_path())
    }

    /// Load config and dataset, and start an engine over them.
    pub fn engine(&self) -> Result<SupplyChainEngine> {
        let loaded = self.load_config()?;
        let path = self.dataset_path(&loaded);
        if !path.exists() {
            bail!(
                "Dataset not found: {}. Pass {} or set [dataset] path in {}.",
                path.display(),
                "--dataset".cyan(),
                crate::config::CONFIG_FILE.cyan()
            );
        }
        SupplyChainEngine::from_dataset(&path, loaded.config.engine_config())
            .with_context(|| format!("Failed to load dataset: {}", path.display()))
    }
}

/// Format a ratio in [0, 1] as a percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
