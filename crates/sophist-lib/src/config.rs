//! Client configuration.

use sophist_cache::CacheConfig;
use sophist_fetch::ClientConfig;
use sophist_fetch::url::TABLES_URL;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for [`Sophist`](crate::Sophist).
#[derive(Debug, Clone)]
pub struct SophistConfig {
    /// Catalog index URL; series pages live below it.
    pub tables_url: String,
    /// HTTP client settings.
    pub client: ClientConfig,
    /// Cache location and expiry.
    pub cache: CacheConfig,
    /// Read and write the cache in `get_table`.
    pub persist: bool,
    /// Also cache tables fetched by `download_table`.
    pub cache_downloads: bool,
    /// Reject names missing from the catalog before fetching their page.
    pub check_catalog: bool,
    /// Report progress at `info` instead of `debug` level.
    pub verbose: bool,
}

impl Default for SophistConfig {
    fn default() -> Self {
        Self {
            tables_url: TABLES_URL.to_string(),
            client: ClientConfig::default(),
            cache: CacheConfig::default(),
            persist: true,
            cache_downloads: true,
            check_catalog: false,
            verbose: true,
        }
    }
}

impl SophistConfig {
    /// Sets the catalog index URL.
    #[must_use]
    pub fn with_tables_url(mut self, url: impl Into<String>) -> Self {
        self.tables_url = url.into();
        self
    }

    /// Sets the HTTP client settings.
    #[must_use]
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Sets the cache configuration.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the cache directory, keeping the expiry.
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache.dir = dir.into();
        self
    }

    /// Sets the maximum age of cache entries.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.cache.max_age = Some(max_age);
        self
    }

    /// Enables or disables the cache for `get_table`.
    #[must_use]
    pub const fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Enables or disables caching of downloaded tables.
    #[must_use]
    pub const fn with_cache_downloads(mut self, cache_downloads: bool) -> Self {
        self.cache_downloads = cache_downloads;
        self
    }

    /// Enables or disables the catalog membership check.
    #[must_use]
    pub const fn with_check_catalog(mut self, check_catalog: bool) -> Self {
        self.check_catalog = check_catalog;
        self
    }

    /// Sets the progress log level.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
