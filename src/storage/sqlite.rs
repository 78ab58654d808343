//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the PageCache trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageCache, StorageResult};
use crate::storage::CachedPage;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;

/// SQLite page cache backend
pub struct SqlitePageCache {
    conn: Connection,
}

impl SqlitePageCache {
    /// Opens or creates a page cache database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqlitePageCache)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA mmap_size = 268435456;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn body_digest(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

impl PageCache for SqlitePageCache {
    fn get_page(&self, url: &str) -> StorageResult<Option<CachedPage>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, body, body_sha256, fetched_at FROM pages WHERE url = ?1")?;

        let page = stmt
            .query_row(params![url], |row| {
                Ok(CachedPage {
                    url: row.get(0)?,
                    body: row.get(1)?,
                    body_sha256: row.get(2)?,
                    fetched_at: row.get(3)?,
                })
            })
            .optional()?;

        Ok(page)
    }

    fn put(&mut self, url: &str, body: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO pages (url, body, body_sha256, fetched_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET
                body = excluded.body,
                body_sha256 = excluded.body_sha256,
                fetched_at = excluded.fetched_at",
            params![url, body, body_digest(body), now],
        )?;
        Ok(())
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
