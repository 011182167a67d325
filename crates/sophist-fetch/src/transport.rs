//! Page retrieval seam.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::{DownloadClient, DownloadError};

/// Retrieves raw page bodies by URL.
///
/// `Ok(None)` means the server reported the page as missing.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Fetches one page.
    async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError>;
}

#[async_trait]
impl Transport for DownloadClient {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        self.download(url).await
    }
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Page(Bytes),
    Status(u16),
}

/// Transport serving a fixed set of pages from memory.
///
/// Unknown URLs answer as missing pages. Every request is recorded.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: HashMap<String, CannedResponse>,
    requests: Mutex<Vec<String>>,
    request_count: AtomicUsize,
}

impl MemoryTransport {
    /// Creates a transport with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` at `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.responses
            .insert(url.into(), CannedResponse::Page(body.into()));
        self
    }

    /// Answers requests for `url` with a server error status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .insert(url.into(), CannedResponse::Status(status));
        self
    }

    /// Returns the number of requests served so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns the requested URLs in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().await.push(url.to_string());

        match self.responses.get(url) {
            Some(CannedResponse::Page(body)) => Ok(Some(body.clone())),
            Some(CannedResponse::Status(status)) => {
                Err(DownloadError::ServerError { status: *status })
            }
            None => Ok(None),
        }
    }
}
