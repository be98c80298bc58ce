//! Export the ontology.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use supplygraph::prelude::*;

use super::Source;

pub fn run(source: &Source, output: &Path) -> Result<()> {
    println!("{} Loading dataset...", "→".blue());
    let engine = source.engine()?;

    let export = engine.export_ontology();
    save_export(&export, output)
        .with_context(|| format!("Failed to write export: {}", output.display()))?;

    println!(
        "{} Exported {} entities and {} relationships to {}",
        "✓".green(),
        export.metadata.entity_count.to_string().cyan(),
        export.metadata.relationship_count.to_string().cyan(),
        output.display().to_string().white().bold()
    );
    for (entity_type, count) in &export.metadata.entities_by_type {
        println!("  {} {:<10} {}", "•".blue(), entity_type.as_str(), count);
    }
    println!("  {} snapshot {}", "•".blue(), export.metadata.snapshot_id.to_string().dimmed());
    Ok(())
}
