//! Get command implementation.
//!
//! This module retrieves series tables, from the cache when possible, and
//! prints them or writes them to files.

use crate::display::{Format, resolve_format, series_progress};
use anyhow::{Context, Result, bail};
use sophist_lib::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Retrieve one or more series and print or save them.
pub(crate) async fn get(
    sophist: &Sophist,
    names: &[String],
    refresh: bool,
    format: Option<Format>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let single_file = names.len() == 1 && output.as_deref().is_some_and(|p| !p.is_dir());
    let format = resolve_format(format, output.as_deref().filter(|_| single_file));

    if output.is_none() && !format.is_text() {
        bail!("{format} output needs --output");
    }

    let progress = series_progress(names.len() as u64, quiet || output.is_none());
    let results = sophist
        .get_tables_with(names, refresh, |name, _| {
            progress.set_message(name.to_string());
            progress.inc(1);
        })
        .await;

    let mut failed = 0usize;
    let mut written = 0usize;
    for (name, result) in names.iter().zip(results) {
        let table = match result {
            Ok(table) => table,
            Err(e) => {
                eprintln!("{name}: {e}");
                failed += 1;
                continue;
            }
        };

        match &output {
            Some(path) => {
                let path = if single_file {
                    path.clone()
                } else {
                    path.join(format!("{name}.{}", format.extension()))
                };
                save(&path, &table, format).await?;
                written += 1;
            }
            None => print_table(name, &table, format, names.len() > 1)?,
        }
    }

    progress.finish_with_message(format!("{} series retrieved", names.len() - failed));

    if written > 0 && !quiet {
        if let Some(path) = &output {
            println!("Output written to: {}", path.display());
        }
    }

    if failed > 0 {
        bail!("{failed} of {} series failed", names.len());
    }
    Ok(())
}

async fn save(path: &Path, table: &SeriesTable, format: OutputFormat) -> Result<()> {
    sophist_lib::write_to(path, table, format)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn print_table(name: &str, table: &SeriesTable, format: OutputFormat, titled: bool) -> Result<()> {
    let mut buf = Vec::new();
    if titled {
        writeln!(buf, "# {name}")?;
    }
    format.write_table(table, &mut buf)?;
    if titled {
        writeln!(buf)?;
    }

    let mut out = std::io::stdout().lock();
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}
