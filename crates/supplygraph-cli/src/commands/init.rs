//! Initialize a new Supplygraph project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Supplygraph project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Supplygraph project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} place your dataset at {}", "1.".blue(), "network.json".cyan());
    println!("  {} supplygraph validate", "2.".blue());
    println!("  {} supplygraph query \"How many items are in L1\"", "3.".blue());

    Ok(())
}
