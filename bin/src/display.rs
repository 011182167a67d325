//! Display utilities and output formatting for the sophist CLI.

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use sophist_lib::prelude::*;
use std::path::Path;

/// Output format for series tables.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the library format this option selects.
    pub(crate) const fn output(self) -> OutputFormat {
        match self {
            Self::Csv => OutputFormat::Csv,
            Self::Tsv => OutputFormat::Tsv,
            Self::Json => OutputFormat::Json,
            Self::Ndjson => OutputFormat::Ndjson,
            Self::Parquet => OutputFormat::Parquet,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output())
    }
}

/// Picks the explicit format, else the one implied by `path`, else CSV.
pub(crate) fn resolve_format(format: Option<Format>, path: Option<&Path>) -> OutputFormat {
    format
        .map(Format::output)
        .or_else(|| path.and_then(OutputFormat::from_path))
        .unwrap_or_default()
}

/// Formats bytes in human-readable form.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Creates a progress bar over `len` series, hidden in quiet mode.
pub(crate) fn series_progress(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} series {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb
}
