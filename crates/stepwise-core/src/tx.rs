//! Transactional database seam
//!
//! `MigrationTx` is the open transaction one invocation runs inside. The
//! caller owns begin/commit/rollback; everything the core does goes through
//! these methods so that dropping the transaction undoes all of it.

use crate::errors::Result;
use crate::model::AppliedVersion;

/// Name of the bookkeeping table
pub const BOOKKEEPING_TABLE: &str = "migrations";

/// An open database transaction able to run scripts and keep the ledger
pub trait MigrationTx {
    /// Execute a batch of statements as written in a script
    ///
    /// # Errors
    ///
    /// Returns the database's error message; the executor attaches unit context.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;

    /// Whether the bookkeeping table exists
    ///
    /// # Errors
    ///
    /// Returns `ReadFailure` if the schema cannot be inspected.
    fn bookkeeping_exists(&mut self) -> Result<bool>;

    /// Create the bookkeeping table if it is missing
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the table cannot be created.
    fn ensure_bookkeeping(&mut self) -> Result<()>;

    /// Row with the highest version, `None` if the table is empty
    ///
    /// Only called once the table is known to exist.
    ///
    /// # Errors
    ///
    /// Returns `ReadFailure` if the query fails.
    fn latest_applied(&mut self) -> Result<Option<AppliedVersion>>;

    /// Every row in ascending version order
    ///
    /// Only called once the table is known to exist.
    ///
    /// # Errors
    ///
    /// Returns `ReadFailure` if the query fails.
    fn list_applied(&mut self) -> Result<Vec<AppliedVersion>>;

    /// Insert a row
    ///
    /// # Errors
    ///
    /// Returns `DuplicateVersion` when the version is already present.
    fn insert_applied(&mut self, record: &AppliedVersion) -> Result<()>;

    /// Delete the row for `version`; absent rows are not an error
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the delete fails.
    fn delete_applied(&mut self, version: i64) -> Result<()>;

    /// Whether schema statements roll back with the transaction
    ///
    /// Back ends that return `false` may leave a failed unit's script
    /// partially applied.
    fn supports_transactional_ddl(&self) -> bool {
        true
    }
}
