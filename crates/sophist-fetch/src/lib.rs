//! HTTP transport and page decoding for sophist.
//!
//! - [`url::series_url`] - Builds series page URLs
//! - [`DownloadClient`] - HTTP client with connection pooling and retries
//! - [`Transport`] - Page retrieval seam, with [`MemoryTransport`] for tests
//! - [`decode_page`] - Legacy-encoding page decoding

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sophist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decode;
mod transport;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use decode::decode_page;
pub use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
pub use transport::{MemoryTransport, Transport};
