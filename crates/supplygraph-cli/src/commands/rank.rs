//! Rank locations by utilization.

use anyhow::Result;
use colored::Colorize;

use super::{percent, Source};

pub fn run(source: &Source, top: usize) -> Result<()> {
    let engine = source.engine()?;
    let ranking = engine.performance_analytics().utilization_by_location;

    println!(
        "{} Top {} locations by utilization:",
        "→".blue(),
        top.to_string().cyan()
    );
    println!();

    for (i, loc) in ranking.iter().take(top).enumerate() {
        let rank = format!("{}.", i + 1);
        let share = if loc.utilization > 1.0 {
            percent(loc.utilization).yellow().bold()
        } else {
            percent(loc.utilization).cyan()
        };
        println!(
            "  {} {} {} {}",
            rank.blue(),
            loc.name.white().bold(),
            share,
            format!("({:.1} of {:.1} m3)", loc.stored_volume, loc.capacity).dimmed()
        );
    }

    if ranking.is_empty() {
        println!("  {}", "No locations in dataset.".dimmed());
    }
    Ok(())
}
