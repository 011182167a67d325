//! Client for the sophist.hse.ru statistical table catalog.
//!
//! This is a facade crate: [`Sophist`] ties the workspace crates together,
//! and the rest of their public API is re-exported for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use sophist_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let sophist = Sophist::new(SophistConfig::default().with_verbose(false))?;
//!
//!     let table = sophist.get_table("HHI_M_I").await?;
//!     for row in table.iter().take(3) {
//!         println!("{} {:?}", row.date(), row.cells());
//!     }
//!
//!     sophist.download_table("HHI_Q_I", "HHI_Q_I.parquet".as_ref()).await?;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sophist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod series;

pub use config::SophistConfig;
pub use series::Sophist;

// Re-export core types
pub use sophist_types::*;

// Re-export parsing stages
pub use sophist_parse::{
    ColumnHeader, ParsedPage, RawTable, TimeAxis, build_time_axis, detect_granularity,
    extract_table, normalize_cell, parse_catalog, parse_period, parse_series_page,
};

// Re-export transport
pub use sophist_fetch::{
    ClientConfig, DownloadClient, DownloadError, Encoding, MemoryTransport, Transport, UTF_8,
    WINDOWS_1251, decode_page, url,
};

// Re-export formatters
pub use sophist_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    ParquetFormatter,
};

// Re-export cache
pub use sophist_cache::{CacheConfig, CacheEntry, CacheError, CacheManager, write_to};

/// Prelude module for convenient imports.
///
/// ```
/// use sophist_lib::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Sophist, SophistConfig};

    pub use sophist_types::{
        CatalogEntry, ErrorKind, Granularity, ParseError, Result, SeriesTable, SophistError,
    };

    pub use sophist_fetch::ClientConfig;

    pub use sophist_format::{Formatter, OutputFormat};

    pub use sophist_cache::{CacheConfig, CacheEntry};
}
