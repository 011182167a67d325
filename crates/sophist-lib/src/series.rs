//! Series retrieval: catalog listing, page fetch, parsing and caching.

use futures::StreamExt;
use sophist_cache::{CacheEntry, CacheError, CacheManager, write_to};
use sophist_fetch::url::series_url;
use sophist_fetch::{DownloadClient, DownloadError, Transport, decode_page};
use sophist_format::OutputFormat;
use sophist_parse::{ParsedPage, parse_catalog, parse_series_page};
use sophist_types::{CatalogEntry, Result, SeriesTable, SophistError};
use std::path::Path;
use std::sync::Arc;

use crate::SophistConfig;

/// Emits a progress event at `info` when verbose, `debug` otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Client for the statistical table catalog.
///
/// Every operation runs to completion before returning; nothing is left
/// running in the background.
#[derive(Debug, Clone)]
pub struct Sophist {
    config: SophistConfig,
    transport: Arc<dyn Transport>,
    cache: CacheManager,
}

impl Sophist {
    /// Creates a client that talks HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::Transport`] if the HTTP client cannot be
    /// created.
    pub fn new(config: SophistConfig) -> Result<Self> {
        let client = DownloadClient::new(config.client.clone())
            .map_err(|e| SophistError::Transport(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(client)))
    }

    /// Creates an HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::Transport`] if the HTTP client cannot be
    /// created.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SophistConfig::default())
    }

    /// Creates a client on top of an arbitrary transport.
    #[must_use]
    pub fn with_transport(config: SophistConfig, transport: Arc<dyn Transport>) -> Self {
        let cache = CacheManager::new(config.cache.clone());
        Self {
            config,
            transport,
            cache,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &SophistConfig {
        &self.config
    }

    /// Returns the cache manager.
    #[must_use]
    pub const fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Returns the page URL of a series.
    #[must_use]
    pub fn table_url(&self, name: &str) -> String {
        series_url(&self.config.tables_url, name)
    }

    /// Lists the series published in the catalog, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::Transport`] if the catalog cannot be
    /// retrieved.
    pub async fn list_tables(&self) -> Result<Vec<CatalogEntry>> {
        let url = &self.config.tables_url;
        let body = self
            .transport
            .get(url)
            .await
            .map_err(transport_error)?
            .ok_or_else(|| SophistError::Transport(format!("catalog not found at {url}")))?;

        let entries = parse_catalog(&decode_page(&body, self.config.client.encoding));
        progress!(self.config.verbose, count = entries.len(), "listed catalog");
        Ok(entries)
    }

    /// Returns a series table, from the cache when possible.
    ///
    /// On a miss the page is fetched and parsed, and the result stored in
    /// the cache. A failed store is logged and does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::InvalidSeriesName`] for a malformed name,
    /// [`SophistError::SeriesNotFound`] if the catalog has no such page,
    /// and transport or parse errors from the fetch.
    pub async fn get_table(&self, name: &str) -> Result<SeriesTable> {
        validate_name(name)?;

        if self.config.persist {
            if let Some(table) = self.cache.load(name).await {
                progress!(self.config.verbose, name, rows = table.len(), "loaded from cache");
                return Ok(table);
            }
        }

        let table = self.fetch_table(name).await?;
        if self.config.persist {
            self.store_quietly(name, &table).await;
        }
        Ok(table)
    }

    /// Fetches a table from the network and replaces its cache entry.
    ///
    /// # Errors
    ///
    /// See [`Sophist::fetch_page`].
    pub async fn refresh_table(&self, name: &str) -> Result<SeriesTable> {
        let table = self.fetch_table(name).await?;
        if self.config.persist {
            self.store_quietly(name, &table).await;
        }
        Ok(table)
    }

    /// Retrieves several tables concurrently.
    ///
    /// Results come back in the order of `names`; one failure does not
    /// abort the others. At most `client.concurrency` pages are in flight.
    pub async fn get_tables<S: AsRef<str>>(&self, names: &[S]) -> Vec<Result<SeriesTable>> {
        self.get_tables_with(names, false, |_, _| {}).await
    }

    /// Retrieves several tables concurrently, reporting each as it completes.
    ///
    /// With `refresh` every table is fetched as [`Sophist::refresh_table`]
    /// does, otherwise as [`Sophist::get_table`]. `on_done` is called once
    /// per name, in completion order; the returned results are in the order
    /// of `names`.
    pub async fn get_tables_with<S, F>(
        &self,
        names: &[S],
        refresh: bool,
        on_done: F,
    ) -> Vec<Result<SeriesTable>>
    where
        S: AsRef<str>,
        F: Fn(&str, &Result<SeriesTable>),
    {
        let on_done = &on_done;
        futures::stream::iter(names)
            .map(|name| async move {
                let name = name.as_ref();
                let result = if refresh {
                    self.refresh_table(name).await
                } else {
                    self.get_table(name).await
                };
                on_done(name, &result);
                result
            })
            .buffered(self.config.client.concurrency.max(1))
            .collect()
            .await
    }

    /// Fetches and parses a series page, bypassing the cache.
    ///
    /// # Errors
    ///
    /// See [`Sophist::fetch_page`].
    pub async fn fetch_table(&self, name: &str) -> Result<SeriesTable> {
        Ok(self.fetch_page(name).await?.table)
    }

    /// Fetches and parses a series page including its header labels.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::InvalidSeriesName`] for a malformed name,
    /// [`SophistError::SeriesNotFound`] if the page does not exist (or is
    /// not listed, with `check_catalog`), [`SophistError::Transport`] on
    /// network failure and [`SophistError::Parse`] if the page is not a
    /// well-formed series table.
    pub async fn fetch_page(&self, name: &str) -> Result<ParsedPage> {
        validate_name(name)?;

        if self.config.check_catalog {
            let listed = self.list_tables().await?;
            if !listed.iter().any(|entry| entry.name == name) {
                return Err(SophistError::SeriesNotFound(name.to_string()));
            }
        }

        let url = self.table_url(name);
        progress!(self.config.verbose, name, url = %url, "fetching series page");

        let body = self
            .transport
            .get(&url)
            .await
            .map_err(transport_error)?
            .ok_or_else(|| SophistError::SeriesNotFound(name.to_string()))?;

        let page = parse_series_page(&decode_page(&body, self.config.client.encoding))?;
        progress!(
            self.config.verbose,
            name,
            rows = page.table.len(),
            columns = page.table.width(),
            granularity = %page.granularity,
            "parsed series page"
        );
        Ok(page)
    }

    /// Fetches a table and writes it to `path`.
    ///
    /// The format follows the path extension, CSV when it has none or an
    /// unknown one.
    ///
    /// # Errors
    ///
    /// Returns fetch errors as [`Sophist::fetch_page`] does, and
    /// [`SophistError::Storage`] or [`SophistError::Format`] if the file
    /// cannot be written.
    pub async fn download_table(&self, name: &str, path: &Path) -> Result<SeriesTable> {
        let format = OutputFormat::from_path(path).unwrap_or_default();
        self.download_table_as(name, path, format).await
    }

    /// Fetches a table and writes it to `path` in `format`.
    ///
    /// # Errors
    ///
    /// See [`Sophist::download_table`].
    pub async fn download_table_as(
        &self,
        name: &str,
        path: &Path,
        format: OutputFormat,
    ) -> Result<SeriesTable> {
        let table = self.fetch_table(name).await?;

        write_to(path, &table, format).await.map_err(storage_error)?;
        progress!(self.config.verbose, name, path = %path.display(), %format, "saved table");

        if self.config.cache_downloads {
            self.store_quietly(name, &table).await;
        }
        Ok(table)
    }

    /// Lists cached series.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::Storage`] if the cache directory cannot be
    /// read.
    pub async fn cached_tables(&self) -> Result<Vec<CacheEntry>> {
        self.cache.entries().await.map_err(storage_error)
    }

    /// Removes every cached table, returning how many entries were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SophistError::Storage`] if an entry cannot be removed.
    pub async fn clear_cache(&self) -> Result<usize> {
        let removed = self.cache.clear().await.map_err(storage_error)?;
        progress!(self.config.verbose, removed, "cleared cache");
        Ok(removed)
    }

    async fn store_quietly(&self, name: &str, table: &SeriesTable) {
        if let Err(e) = self.cache.store(name, table).await {
            tracing::warn!(name, error = %e, "failed to cache table");
        }
    }
}

/// Checks that a series name is safe to embed in a URL and a file name.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(SophistError::InvalidSeriesName(name.to_string()))
    }
}

fn transport_error(error: DownloadError) -> SophistError {
    SophistError::Transport(error.to_string())
}

fn storage_error(error: CacheError) -> SophistError {
    match error {
        CacheError::Encode(e) => SophistError::Format(e.to_string()),
        other => SophistError::Storage(other.to_string()),
    }
}
