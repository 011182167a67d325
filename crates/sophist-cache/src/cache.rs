//! Cache directory management.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use sophist_format::{FormatError, OutputFormat};
use sophist_types::SeriesTable;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::codec::{self, CodecError};

/// File extension of cache entries.
const ENTRY_EXTENSION: &str = "csv";

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create a directory.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a directory.
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("failed to delete '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to decode a cache entry.
    #[error("failed to decode cache entry '{path}': {source}")]
    Decode {
        /// The entry path.
        path: PathBuf,
        /// The underlying decoding error.
        source: CodecError,
    },

    /// Failed to encode a table.
    #[error("failed to encode table: {0}")]
    Encode(#[from] FormatError),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Cache location and expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory holding one file per series.
    pub dir: PathBuf,
    /// Entries older than this are misses. `None` keeps entries forever.
    pub max_age: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(CacheManager::default_path())
    }
}

impl CacheConfig {
    /// Creates a configuration for `dir` without expiry.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir, max_age: None }
    }

    /// Sets the maximum entry age.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
}

/// One persisted series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Series name.
    pub name: String,
    /// Path of the entry file.
    pub path: PathBuf,
    /// Time the entry was written.
    pub modified: DateTime<Utc>,
    /// File size in bytes.
    pub size: u64,
}

/// Manages the on-disk cache of parsed tables.
///
/// Entries live at `<dir>/<name>.csv`. The directory is created on the
/// first store.
#[derive(Debug, Clone)]
pub struct CacheManager {
    config: CacheConfig,
}

impl CacheManager {
    /// Creates a cache manager.
    #[must_use]
    pub const fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Returns the default cache directory.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.cache/sophist/`
    /// - macOS: `~/Library/Caches/sophist/`
    /// - Windows: `C:\Users\<User>\AppData\Local\sophist\cache\`
    ///
    /// Falls back to `~/.sophist/cache/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "sophist")
            .map_or_else(dirs_fallback, |dirs| dirs.cache_dir().to_path_buf())
    }

    /// Returns the cache configuration.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Returns the path of the entry for `name`.
    #[must_use]
    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.config.dir.join(format!("{name}.{ENTRY_EXTENSION}"))
    }

    /// Loads a cached table.
    ///
    /// Missing, expired and unreadable entries are all misses; the latter
    /// are logged.
    pub async fn load(&self, name: &str) -> Option<SeriesTable> {
        match self.read(name).await {
            Ok(Some(table)) => {
                tracing::debug!(name, "cache hit");
                Some(table)
            }
            Ok(None) => {
                tracing::debug!(name, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Reads a cached table, reporting failures.
    ///
    /// Returns `Ok(None)` when there is no entry or it has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be read or decoded.
    pub async fn read(&self, name: &str) -> Result<Option<SeriesTable>> {
        let path = self.entry_path(name);

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::ReadFile { path, source: e }),
        };

        if let Some(max_age) = self.config.max_age {
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok());
            if age.is_some_and(|age| age > max_age) {
                tracing::debug!(name, "cache entry expired");
                return Ok(None);
            }
        }

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::ReadFile { path, source: e }),
        };

        codec::decode_table(file)
            .await
            .map(Some)
            .map_err(|source| CacheError::Decode { path, source })
    }

    /// Stores a table, replacing any previous entry.
    ///
    /// Returns the entry path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the entry
    /// cannot be written.
    pub async fn store(&self, name: &str, table: &SeriesTable) -> Result<PathBuf> {
        let path = self.entry_path(name);
        let bytes = codec::encode_table(table)?;
        write_atomic(&path, &bytes).await?;
        tracing::debug!(name, path = %path.display(), "cached table");
        Ok(path)
    }

    /// Lists cache entries sorted by name.
    ///
    /// A missing cache directory has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn entries(&self) -> Result<Vec<CacheEntry>> {
        let dir = self.dir();
        let mut read_dir = match fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CacheError::ReadDir {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| CacheError::ReadDir {
                path: dir.to_path_buf(),
                source: e,
            })?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != ENTRY_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
            else {
                continue;
            };
            // skip entries removed while listing
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()
                .map_or_else(|_| DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::from);
            entries.push(CacheEntry {
                name,
                path,
                modified,
                size: metadata.len(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Removes everything inside the cache directory.
    ///
    /// Returns the number of removed entries. A missing or empty directory
    /// yields zero. Nothing outside the directory is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or an entry cannot
    /// be removed.
    pub async fn clear(&self) -> Result<usize> {
        let dir = self.dir();
        let mut read_dir = match fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(CacheError::ReadDir {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut removed = 0;
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| CacheError::ReadDir {
                path: dir.to_path_buf(),
                source: e,
            })?
        {
            let path = entry.path();
            // symlinks are unlinked, never followed
            let is_dir = fs::symlink_metadata(&path)
                .await
                .is_ok_and(|metadata| metadata.is_dir());
            let result = if is_dir {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::DeleteFile { path, source: e }),
            }
        }

        tracing::debug!(dir = %dir.display(), removed, "cleared cache");
        Ok(removed)
    }
}

/// Writes `table` to `path` in `format`, atomically.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if formatting fails or the file cannot be written.
pub async fn write_to(path: &Path, table: &SeriesTable, format: OutputFormat) -> Result<()> {
    let mut bytes = Vec::new();
    format.write_table(table, &mut bytes)?;
    write_atomic(path, &bytes).await
}

/// Writes `bytes` to a temporary sibling of `path`, then renames it into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .await
        .map_err(|e| CacheError::CreateDir {
            path: parent.clone(),
            source: e,
        })?;

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("entry");
    let tmp = parent.join(format!(
        ".{file_name}.tmp.{}.{}",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let written = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(CacheError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".sophist")
        .join("cache")
}
