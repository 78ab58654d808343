//! Storage module for the on-disk page cache
//!
//! Downloaded archive pages and articles are cached in SQLite so that a
//! re-run over the same date window replays from disk instead of refetching.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqlitePageCache;
pub use traits::{PageCache, StorageError, StorageResult};

use std::path::Path;

/// Opens or creates a page cache database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqlitePageCache)` - Successfully opened cache
/// * `Err(StorageError)` - Failed to open the database
pub fn open_page_cache(path: &Path) -> StorageResult<SqlitePageCache> {
    SqlitePageCache::new(path)
}

/// Represents a cached page in the database
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub url: String,
    pub body: String,
    pub body_sha256: String,
    pub fetched_at: String,
}
