//! List command.

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::error::Result;

/// List store entries by display name.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let index = super::store_index(config)?;
    let entries = index.entries()?;
    info!(count = entries.len(), "listing entries");

    let names: Vec<&String> = entries.keys().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        output::dimmed("no entries in password store");
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
