//! List inventory at a location.

use anyhow::Result;
use colored::Colorize;
use supplygraph::agents::rules::fmt_qty;
use supplygraph::prelude::*;

use super::Source;

pub fn run(source: &Source, location: &str) -> Result<()> {
    let engine = source.engine()?;
    let location_id = EntityId::from(location);
    let lines = engine.inventory(&location_id)?;

    let snapshot = engine.snapshot();
    let name = snapshot.graph().get_entity(&location_id)?.display_name().to_string();

    println!(
        "{} Inventory at {} {}",
        "→".blue(),
        name.white().bold(),
        format!("({location})").dimmed()
    );
    println!();

    if lines.is_empty() {
        println!("  {}", "No inventory records.".dimmed());
        return Ok(());
    }

    let mut available = 0.0;
    let mut reserved = 0.0;
    for line in &lines {
        let product = line
            .product_id
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:<12} {:>10} {}",
            line.inventory_id.to_string().cyan(),
            product,
            fmt_qty(line.quantity_available),
            format!("({} reserved)", fmt_qty(line.quantity_reserved)).dimmed()
        );
        available += line.quantity_available;
        reserved += line.quantity_reserved;
    }

    println!();
    println!(
        "  {} {} available, {} reserved across {} records",
        "Σ".blue(),
        fmt_qty(available).white().bold(),
        fmt_qty(reserved),
        lines.len()
    );
    Ok(())
}
