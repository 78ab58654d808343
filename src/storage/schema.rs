//! Database schema definitions
//!
//! This module contains the SQL schema for the page cache database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Downloaded page bodies keyed by requested URL
CREATE TABLE IF NOT EXISTS pages (
    url TEXT PRIMARY KEY,
    body TEXT NOT NULL,
    body_sha256 TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_fetched_at ON pages(fetched_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
