//! Output format abstraction.

use sophist_types::SeriesTable;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON array of records.
    Json,
    /// Newline-delimited JSON records.
    Ndjson,
    /// Apache Parquet.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Tsv, Self::Json, Self::Ndjson, Self::Parquet]
    }

    /// Returns true for formats that can be printed to a terminal.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        !matches!(self, Self::Parquet)
    }

    /// Infers the format from a file extension.
    ///
    /// Returns `None` when the path has no extension or an unknown one.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Writes `table` in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails, or if the format was compiled out.
    pub fn write_table<W: Write + Send>(
        &self,
        table: &SeriesTable,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_table(table, writer),
            Self::Tsv => CsvFormatter::tsv().write_table(table, writer),
            Self::Json => JsonFormatter::new().write_table(table, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_table(table, writer),
            #[cfg(feature = "parquet")]
            Self::Parquet => crate::ParquetFormatter::new().write_table(table, writer),
            #[cfg(not(feature = "parquet"))]
            Self::Parquet => Err(FormatError::UnknownFormat(
                "parquet (feature disabled)".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Trait for table writers.
pub trait Formatter: Send + Sync {
    /// Writes a table to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write + Send>(
        &self,
        table: &SeriesTable,
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}
