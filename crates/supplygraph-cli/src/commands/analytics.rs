//! Show network KPIs.

use anyhow::{Context, Result};
use colored::Colorize;
use supplygraph::prelude::*;

use super::{percent, Source};

pub fn run(source: &Source, json: bool) -> Result<()> {
    let engine = source.engine()?;
    let report = engine.performance_analytics();

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    let health = &report.network_health;
    let status = match health.status {
        HealthStatus::Excellent => health.status.as_str().green().bold(),
        HealthStatus::Good => health.status.as_str().cyan().bold(),
        HealthStatus::NeedsAttention => health.status.as_str().yellow().bold(),
    };

    println!("{}", "Supply-Chain Performance".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Network Health".blue().bold());
    println!("  Score:               {} {}", format!("{:.3}", health.score).cyan(), status);
    println!("  Fulfillment rate:    {}", percent(report.fulfillment_rate).cyan());
    println!("  On-time delivery:    {}", percent(report.on_time_rate).cyan());
    println!("  Order completion:    {}", percent(report.completion_rate).cyan());
    println!("  Average utilization: {}", percent(health.average_utilization).cyan());
    println!();

    if !report.location_performance.is_empty() {
        println!("{}", "Locations".blue().bold());
        for loc in &report.location_performance {
            println!(
                "  {:<24} {:>7}  {} in / {} out  {}",
                loc.name.white(),
                percent(loc.utilization),
                loc.incoming_shipments,
                loc.outgoing_shipments,
                format!("efficiency {:.2}", loc.efficiency).dimmed()
            );
        }
        println!();
    }

    if !report.supplier_scores.is_empty() {
        println!("{}", "Suppliers".blue().bold());
        for supplier in &report.supplier_scores {
            println!(
                "  {:<24} {}",
                supplier.name.white(),
                format!("{:.2}", supplier.reliability).cyan()
            );
        }
        println!();
    }

    for warning in &report.capacity_warnings {
        println!("{} {}", "!".yellow().bold(), warning.to_string().yellow());
    }

    Ok(())
}
