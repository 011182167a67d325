//! Clear command implementation.

use anyhow::{Context, Result};
use inquire::Confirm;
use sophist_lib::prelude::*;

/// Remove every cached series, asking first unless `yes` is set.
pub(crate) async fn clear(sophist: &Sophist, yes: bool) -> Result<()> {
    let dir = sophist.cache().dir().display().to_string();

    if !yes {
        let confirmed = Confirm::new(&format!("Remove all cached series in {dir}?"))
            .with_default(false)
            .prompt()
            .context("Confirmation cancelled")?;
        if !confirmed {
            println!("Nothing removed.");
            return Ok(());
        }
    }

    let removed = sophist
        .clear_cache()
        .await
        .context("Failed to clear the cache")?;

    println!("Removed {removed} entries from {dir}");
    Ok(())
}
