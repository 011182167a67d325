//! HTTP client for catalog and series pages.

use bytes::Bytes;
use encoding_rs::{Encoding, WINDOWS_1251};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum concurrent page requests.
    pub concurrency: usize,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Encoding of catalog pages.
    pub encoding: &'static Encoding,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            user_agent: format!("sophist/{}", env!("CARGO_PKG_VERSION")),
            encoding: WINDOWS_1251,
        }
    }
}

/// Errors that can occur during downloads.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },
}

/// HTTP client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.concurrency)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads a page, returning its raw bytes.
    ///
    /// Returns `Ok(None)` if the page does not exist (404).
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails after all retries.
    pub async fn download(&self, url: &str) -> Result<Option<Bytes>, DownloadError> {
        let mut attempts = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.backoff_delay(attempts);
                            tracing::warn!(
                                url,
                                status = status.as_u16(),
                                attempt = attempts,
                                delay_ms = delay.as_millis() as u64,
                                "retrying page request"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(DownloadError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    response.error_for_status_ref()?;
                    return Ok(Some(response.bytes().await?));
                }
                Err(e) if is_retryable(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.backoff_delay(attempts);
                    tracing::warn!(url, error = %e, attempt = attempts, "retrying page request");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Exponential backoff capped at `max_delay_ms`, with ±25% jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let capped = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10))
            .min(self.config.max_delay_ms);

        // deterministic jitter keyed on the attempt number
        let range = capped / 4;
        let offset = if range > 0 {
            (u64::from(attempt) * 17) % (range * 2)
        } else {
            0
        };

        let delay = (capped + offset).saturating_sub(range).max(100);
        Duration::from_millis(delay)
    }
}

fn is_retryable(error: &reqwest::Error) -> bool {
    !error.is_builder() && (error.is_timeout() || error.is_connect() || error.is_request())
}
