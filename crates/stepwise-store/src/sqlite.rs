//! SQLite transaction adapter
//!
//! Wraps a `rusqlite::Transaction` so the core engine can run scripts and
//! keep the `migrations` table inside it. Dropping a `SqliteTx` without
//! calling `commit` rolls everything back, schema statements included.

use crate::errors::{
    foreign_key_violation, from_rusqlite, insert_failure, persistence, read_failure, Result,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use stepwise_core::model::AppliedVersion;
use stepwise_core::tx::{MigrationTx, BOOKKEEPING_TABLE};

const CREATE_BOOKKEEPING: &str = "CREATE TABLE IF NOT EXISTS migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL
)";

/// Open migration transaction on a SQLite connection
pub struct SqliteTx<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> SqliteTx<'conn> {
    /// Begin a transaction on `conn`
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        let tx = conn.transaction().map_err(|e| persistence("begin", e))?;
        Ok(Self { tx })
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(|e| persistence("commit", e))
    }

    pub fn rollback(self) -> Result<()> {
        self.tx.rollback().map_err(|e| persistence("rollback", e))
    }

    /// Fail if any row references a parent row that does not exist
    ///
    /// Foreign keys are not enforced while scripts run, so this is checked
    /// once before commit.
    pub fn check_foreign_keys(&self) -> Result<()> {
        let mut stmt = self
            .tx
            .prepare("PRAGMA foreign_key_check")
            .map_err(|e| persistence("foreign_key_check", e))?;
        let violation = stmt
            .query_row([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .optional()
            .map_err(|e| persistence("foreign_key_check", e))?;

        match violation {
            Some((table, rowid, parent)) => Err(foreign_key_violation(&table, rowid, &parent)),
            None => Ok(()),
        }
    }
}

impl MigrationTx for SqliteTx<'_> {
    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.tx.execute_batch(sql).map_err(from_rusqlite)
    }

    fn bookkeeping_exists(&mut self) -> Result<bool> {
        self.tx
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [BOOKKEEPING_TABLE],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
            .map_err(read_failure)
    }

    fn ensure_bookkeeping(&mut self) -> Result<()> {
        self.tx
            .execute(CREATE_BOOKKEEPING, [])
            .map(|_| ())
            .map_err(|e| persistence("create_bookkeeping", e))
    }

    fn latest_applied(&mut self) -> Result<Option<AppliedVersion>> {
        self.tx
            .query_row(
                "SELECT version, name FROM migrations ORDER BY version DESC LIMIT 1",
                [],
                row_to_applied,
            )
            .optional()
            .map_err(read_failure)
    }

    fn list_applied(&mut self) -> Result<Vec<AppliedVersion>> {
        let mut stmt = self
            .tx
            .prepare("SELECT version, name FROM migrations ORDER BY version ASC")
            .map_err(read_failure)?;
        let rows = stmt
            .query_map([], row_to_applied)
            .map_err(read_failure)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(read_failure)?;
        Ok(rows)
    }

    fn insert_applied(&mut self, record: &AppliedVersion) -> Result<()> {
        self.tx
            .execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![record.version, record.name],
            )
            .map(|_| ())
            .map_err(|e| insert_failure(record.version, e))
    }

    fn delete_applied(&mut self, version: i64) -> Result<()> {
        self.tx
            .execute("DELETE FROM migrations WHERE version = ?1", [version])
            .map(|_| ())
            .map_err(|e| persistence("unrecord", e))
    }
}

// A table created by the operator's own first script may allow NULL names
fn row_to_applied(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppliedVersion> {
    let version: i64 = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    Ok(AppliedVersion::new(version, name.unwrap_or_default()))
}
