//! Download command implementation.
//!
//! This module fetches a series from the network and writes it to a file.

use crate::display::{Format, resolve_format};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use sophist_lib::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

/// Fetch a series and write it to `output` (default `<name>.<format>`).
pub(crate) async fn download(
    sophist: &Sophist,
    name: &str,
    output: Option<PathBuf>,
    format: Option<Format>,
    quiet: bool,
) -> Result<()> {
    let format = resolve_format(format, output.as_deref());
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.{}", format.extension())));

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {}", sophist.table_url(name)));
        pb
    };

    let table = sophist
        .download_table_as(name, &output, format)
        .await
        .with_context(|| format!("Failed to download {name}"))?;

    spinner.finish_with_message(format!(
        "Downloaded {} rows x {} columns",
        table.len(),
        table.width()
    ));

    if !quiet {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
