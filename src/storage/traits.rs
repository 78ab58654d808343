//! Storage traits and error types
//!
//! This module defines the trait interface for page cache backends and
//! associated error types.

use crate::storage::CachedPage;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page cache implementations
///
/// A page cache lets a re-run replay downloads from disk instead of the
/// network. Bodies are keyed by the exact URL string that was requested.
pub trait PageCache {
    /// Returns the full cache record for a URL
    fn get_page(&self, url: &str) -> StorageResult<Option<CachedPage>>;

    /// Returns the cached body for a URL
    fn get(&self, url: &str) -> StorageResult<Option<String>> {
        Ok(self.get_page(url)?.map(|page| page.body))
    }

    /// Stores a body, replacing any earlier one for the same URL
    fn put(&mut self, url: &str, body: &str) -> StorageResult<()>;

    /// Number of cached pages
    fn count(&self) -> StorageResult<u64>;
}
