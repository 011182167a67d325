//! On-disk cache of parsed sophist statistical tables.
//!
//! - [`CacheManager`] - Load, store, list and clear cache entries
//! - [`codec`] - The CSV encoding of a cached table
//! - [`write_to`] - Atomic export to an arbitrary path

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sophist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
pub mod codec;

pub use cache::{CacheConfig, CacheEntry, CacheError, CacheManager, Result, write_to};
pub use codec::CodecError;
