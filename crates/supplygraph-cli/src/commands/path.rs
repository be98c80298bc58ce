//! Find the shortest connection between two entities.

use anyhow::Result;
use colored::Colorize;
use supplygraph::prelude::*;

use super::Source;

pub fn run(source: &Source, from: &str, to: &str) -> Result<()> {
    let engine = source.engine()?;
    let path = engine.find_path(&EntityId::from(from), &EntityId::from(to))?;

    if path.is_empty() {
        println!(
            "{} No path between {} and {} within {} hops",
            "•".yellow(),
            from.cyan(),
            to.cyan(),
            engine.config().traversal_depth
        );
        return Ok(());
    }

    println!("{} Path ({} hops):", "→".blue(), path.len() - 1);
    let snapshot = engine.snapshot();
    for (i, id) in path.iter().enumerate() {
        let label = snapshot
            .graph()
            .get_entity(id)
            .map(|e| format!("{} [{}]", e.display_name(), e.entity_type))
            .unwrap_or_else(|_| id.to_string());
        println!("  {} {}", format!("{}.", i + 1).blue(), label.white().bold());
    }
    Ok(())
}
