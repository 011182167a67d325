//! CLI command implementations.

pub(crate) mod cache;
pub(crate) mod clear;
pub(crate) mod download;
pub(crate) mod get;
pub(crate) mod info;
pub(crate) mod list;
