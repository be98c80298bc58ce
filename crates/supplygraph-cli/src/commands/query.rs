//! Ask questions of the supply-chain network.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use supplygraph::prelude::*;

use super::{percent, Source};

pub fn run(source: &Source, queries: &[String], agent: Option<&str>, json: bool) -> Result<()> {
    let engine = source.engine()?;
    let agent = match agent {
        Some(name) => AgentKind::parse(name).ok_or_else(|| {
            anyhow!(
                "Unknown agent '{}'. Expected one of: {}",
                name,
                AgentKind::ALL.map(|k| k.as_str()).join(", ")
            )
        })?,
        None => engine.config().default_agent,
    };

    // One session for the whole invocation so model-based answers build on
    // each other.
    let session = engine.open_session();
    let results: Vec<QueryResult> = queries
        .iter()
        .map(|q| engine.process_query(q, agent, Some(session)))
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
        println!("{out}");
        return Ok(());
    }

    for result in &results {
        print_result(result);
    }
    Ok(())
}

fn print_result(result: &QueryResult) {
    println!("{} {}", "?".blue().bold(), result.query.white().bold());
    println!(
        "  {} {}  {} {}  {}",
        "agent:".dimmed(),
        result.agent.as_str().cyan(),
        "intent:".dimmed(),
        result.intent.as_str().cyan(),
        format!("({:.2} ms)", result.elapsed_ms).dimmed()
    );
    println!();

    for step in &result.trace {
        println!(
            "  {} {} {}",
            format!("{}.", step.step).blue(),
            step.description.white(),
            format!("[{:.2}]", step.confidence).dimmed()
        );
        println!("     {} {}", "action:".dimmed(), step.action);
        println!("     {} {}", "saw:".dimmed(), step.observation);
    }
    println!();

    println!("  {} {}", "→".green(), result.answer.white().bold());
    println!(
        "  {} {}",
        "confidence:".dimmed(),
        percent(result.overall_confidence).cyan()
    );
    for warning in &result.warnings {
        println!("  {} {}", "!".yellow().bold(), warning.to_string().yellow());
    }
    println!();
}
