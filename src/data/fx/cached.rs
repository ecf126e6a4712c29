//! Disk cache decorator for rate table providers
//!
//! Keeps the last fetched table as a JSON array of raw rows in a file and
//! serves it while the file's modification time is younger than the TTL.
//! The cache is soft: an unreadable file means a refetch, a failed write
//! only costs the next call a download. Concurrent writers are not
//! coordinated; the last one wins.

use super::base::{RateTable, RateTableProvider};
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default time-to-live for the cache file
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default cache file name inside the system temp directory
pub const DEFAULT_CACHE_FILE_NAME: &str = "exchange_rates.json";

/// `<temp dir>/exchange_rates.json`
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_CACHE_FILE_NAME)
}

/// TTL-gated file cache wrapped around another provider
pub struct CachedRateTableProvider<P> {
    inner: P,
    path: PathBuf,
    ttl: Duration,
}

impl<P: RateTableProvider> CachedRateTableProvider<P> {
    /// Cache at the default location with the default TTL
    pub fn new(inner: P) -> Self {
        Self::with_path(inner, default_cache_path(), DEFAULT_CACHE_TTL)
    }

    pub fn with_path(inner: P, path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            inner,
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Age of the cache file, `None` if there is none.
    /// A modification time in the future counts as age zero.
    pub fn age(&self) -> Option<Duration> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Whether a call would be served from disk
    pub fn is_fresh(&self) -> bool {
        self.age().map_or(false, |age| age < self.ttl)
    }

    /// Remove the cache file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self) -> Result<RateTable> {
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn store(&self, table: &RateTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(writer, table)?;
        Ok(())
    }

    /// Table from disk if fresh, otherwise from the inner provider
    /// (persisting the new table on the way out)
    pub fn fetch_or_cached_table(&self) -> Result<RateTable> {
        if self.is_fresh() {
            log::debug!("Loading from cached file: {}", self.path.display());
            match self.load() {
                Ok(table) => return Ok(table),
                Err(e) => log::warn!(
                    "Ignoring unreadable cache file {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }

        let table = self.inner.fetch_table()?;
        if let Err(e) = self.store(&table) {
            log::warn!("Failed to write cache file {}: {}", self.path.display(), e);
        }
        Ok(table)
    }
}

impl<P: RateTableProvider> RateTableProvider for CachedRateTableProvider<P> {
    fn fetch_table(&self) -> Result<RateTable> {
        self.fetch_or_cached_table()
    }
}
