//! Core types for the sophist statistical table client.
//!
//! This crate provides the fundamental data structures used throughout sophist:
//!
//! - [`SeriesTable`] - A parsed, time-indexed statistical table
//! - [`CatalogEntry`] - One series listed in the remote catalog
//! - [`Granularity`] - Period resolution of a series (quarterly, monthly, annual)
//! - [`SophistError`] / [`ErrorKind`] - Errors and their stable kinds

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sophist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod error;
mod granularity;
mod table;

pub use catalog::CatalogEntry;
pub use error::{ErrorKind, ParseError, Result, SophistError};
pub use granularity::{Granularity, GranularityParseError};
pub use table::{INDEX_NAME, Row, SeriesTable};
