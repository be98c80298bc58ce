//! Print the network projection.

use anyhow::{Context, Result};

use super::Source;

pub fn run(source: &Source) -> Result<()> {
    let engine = source.engine()?;
    let projection = engine.network_projection();
    let out = serde_json::to_string_pretty(&projection).context("Failed to serialize projection")?;
    println!("{out}");
    Ok(())
}
