//! List command implementation.
//!
//! This module handles listing the catalog with an optional name filter.

use crate::display::format_bytes;
use anyhow::{Context, Result};
use sophist_lib::prelude::*;

/// List catalog series, optionally filtered by a case-insensitive pattern.
pub(crate) async fn list_tables(sophist: &Sophist, search: Option<&str>, json: bool) -> Result<()> {
    let mut entries = sophist
        .list_tables()
        .await
        .context("Failed to retrieve the catalog")?;

    if let Some(pattern) = search {
        let pattern = pattern.to_lowercase();
        entries.retain(|entry| entry.name.to_lowercase().contains(&pattern));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No series found.");
        return Ok(());
    }

    println!(
        "{:<24} {:<18} {:>10} {:<10}",
        "NAME", "MODIFIED", "SIZE", "FREQUENCY"
    );
    println!("{}", "-".repeat(65));

    for entry in &entries {
        let frequency = entry
            .granularity_hint()
            .map_or_else(|| "-".to_string(), |g| g.to_string());
        println!(
            "{:<24} {:<18} {:>10} {:<10}",
            entry.name,
            entry.last_modified.format("%Y-%m-%d %H:%M"),
            format_bytes(entry.size),
            frequency
        );
    }

    println!("\nTotal: {} series", entries.len());
    Ok(())
}
