//! Cache command implementation.

use crate::display::format_bytes;
use anyhow::{Context, Result};
use sophist_lib::prelude::*;

/// List cached series.
pub(crate) async fn show_cache(sophist: &Sophist) -> Result<()> {
    let entries = sophist
        .cached_tables()
        .await
        .context("Failed to read the cache")?;

    println!("Cache directory: {}\n", sophist.cache().dir().display());

    if entries.is_empty() {
        println!("No cached series.");
        return Ok(());
    }

    println!("{:<24} {:<20} {:>10}", "NAME", "CACHED AT", "SIZE");
    println!("{}", "-".repeat(56));

    for entry in &entries {
        println!(
            "{:<24} {:<20} {:>10}",
            entry.name,
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
            format_bytes(entry.size)
        );
    }

    let total: u64 = entries.iter().map(|e| e.size).sum();
    println!(
        "\nTotal: {} series ({})",
        entries.len(),
        format_bytes(total)
    );
    Ok(())
}
