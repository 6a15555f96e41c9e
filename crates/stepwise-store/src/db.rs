//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path, creating the file if needed
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection for migration runs
pub fn configure(conn: &Connection) -> Result<()> {
    // Table rebuilds drop tables other tables still reference
    set_foreign_keys(conn, false)?;

    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Whether the connection currently enforces foreign keys
pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool> {
    conn.pragma_query_value(None, "foreign_keys", |row| row.get::<_, i64>(0))
        .map(|v| v != 0)
        .map_err(from_rusqlite)
}

/// Turn foreign key enforcement on or off; has no effect inside a transaction
pub fn set_foreign_keys(conn: &Connection, enabled: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", if enabled { "ON" } else { "OFF" })
        .map_err(from_rusqlite)
}
