//! HTML table, period and number parsing for sophist.
//!
//! This crate provides the parsing pipeline, leaf-first:
//!
//! - [`normalize_cell`] - Comma-decimal numeric tokens to `f64` or missing
//! - [`parse_period`] / [`build_time_axis`] - Period labels to canonical dates
//! - [`extract_table`] - Series page HTML to header and raw rows
//! - [`parse_catalog`] - Catalog directory listing to entries
//! - [`parse_series_page`] - All of the above, producing a [`SeriesTable`](sophist_types::SeriesTable)
//!
//! Every function here is pure and safe to call from concurrent tasks.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sophist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod number;
mod page;
mod period;
mod table;

pub use catalog::{PAGE_EXTENSIONS, parse_catalog};
pub use number::{MISSING_SENTINELS, MalformedCell, normalize_cell};
pub use page::{ParsedPage, build_table, parse_series_page};
pub use period::{TimeAxis, build_time_axis, detect_granularity, parse_period};
pub use table::{ColumnHeader, RawRow, RawTable, extract_table};
