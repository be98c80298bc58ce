//! Validate a dataset file.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use supplygraph::prelude::*;

use super::Source;

pub fn run(source: &Source, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => {
            let loaded = source.load_config()?;
            source.dataset_path(&loaded)
        }
    };

    println!("{} Validating {}...", "→".blue(), path.display());
    let dataset = read_dataset(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let report = dataset.validate();

    println!(
        "  {} {} of {} entities accepted",
        "•".blue(),
        report.accepted_entities.to_string().cyan(),
        dataset.entities.len()
    );
    println!(
        "  {} {} of {} relationships accepted",
        "•".blue(),
        report.accepted_relationships.to_string().cyan(),
        dataset.relationships.len()
    );

    if report.is_valid() {
        println!("{} Dataset is valid", "✓".green().bold());
        return Ok(());
    }

    println!();
    for error in &report.errors {
        println!("  {} {}", "✗".red(), error);
    }
    bail!("{} problem(s) found", report.errors.len());
}
