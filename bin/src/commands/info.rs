//! Info command implementation.
//!
//! This module displays the columns, labels and time span of a series.

use anyhow::{Context, Result};
use sophist_lib::prelude::*;

/// Show details of a series page and its cache status.
pub(crate) async fn show_info(sophist: &Sophist, name: &str) -> Result<()> {
    let page = sophist
        .fetch_page(name)
        .await
        .with_context(|| format!("Failed to fetch {name}"))?;
    let table = &page.table;

    println!("Series:      {name}");
    println!("URL:         {}", sophist.table_url(name));
    println!("Frequency:   {}", page.granularity);
    println!("Rows:        {}", table.len());
    if let Some((first, last)) = table.date_span() {
        println!("Span:        {first} .. {last}");
    }
    println!("Missing:     {}", table.missing_count());

    let cache_path = sophist.cache().entry_path(name);
    if cache_path.exists() {
        println!("Cached:      {}", cache_path.display());
    } else {
        println!("Cached:      no");
    }

    println!("\nColumns:");
    println!("{:<24} {:>8} LABEL", "CODE", "VALUES");
    println!("{}", "-".repeat(60));

    for header in &page.headers {
        let observed = table
            .column(&header.code)
            .map_or(0, |values| values.iter().flatten().count());
        println!(
            "{:<24} {:>8} {}",
            header.code,
            observed,
            header.label.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
