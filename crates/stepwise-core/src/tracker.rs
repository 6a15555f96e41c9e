//! Applied-state tracker
//!
//! Reads and maintains the bookkeeping table. A missing table is the normal
//! state of a fresh database and reads as "nothing applied".

use crate::errors::Result;
use crate::model::{AppliedVersion, MigrationUnit};
use crate::tx::MigrationTx;

/// Latest applied state, or the `{0, ""}` sentinel when nothing is applied
///
/// # Errors
///
/// Returns `ReadFailure` for any failure other than the table being absent
/// or empty.
pub fn current_version(tx: &mut dyn MigrationTx) -> Result<AppliedVersion> {
    if !tx.bookkeeping_exists()? {
        return Ok(AppliedVersion::none());
    }
    Ok(tx.latest_applied()?.unwrap_or_else(AppliedVersion::none))
}

/// Every applied row in ascending order; empty when the table is absent
///
/// # Errors
///
/// Returns `ReadFailure` if the table exists but cannot be read.
pub fn applied_versions(tx: &mut dyn MigrationTx) -> Result<Vec<AppliedVersion>> {
    if !tx.bookkeeping_exists()? {
        return Ok(Vec::new());
    }
    tx.list_applied()
}

/// Record `unit` as applied, creating the bookkeeping table on first use
///
/// # Errors
///
/// Returns `DuplicateVersion` if the version is already recorded.
pub fn record(tx: &mut dyn MigrationTx, unit: &MigrationUnit) -> Result<()> {
    tx.ensure_bookkeeping()?;
    tx.insert_applied(&unit.applied())
}

/// Remove the row for `version`; a missing row or table is a no-op
///
/// # Errors
///
/// Returns an error if the table exists and the delete fails.
pub fn unrecord(tx: &mut dyn MigrationTx, version: i64) -> Result<()> {
    if !tx.bookkeeping_exists()? {
        return Ok(());
    }
    tx.delete_applied(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MigrateError;
    use crate::memory::MemoryDb;

    #[test]
    fn test_absent_table_is_sentinel() {
        let mut db = MemoryDb::new();
        let mut tx = db.begin();
        assert_eq!(current_version(&mut tx).unwrap(), AppliedVersion::none());
        assert!(applied_versions(&mut tx).unwrap().is_empty());
    }

    #[test]
    fn test_empty_table_is_sentinel() {
        let mut db = MemoryDb::new().with_bookkeeping();
        let mut tx = db.begin();
        assert_eq!(current_version(&mut tx).unwrap(), AppliedVersion::none());
    }

    #[test]
    fn test_record_then_current() {
        let mut db = MemoryDb::new();
        let mut tx = db.begin();
        record(&mut tx, &MigrationUnit::new(1, "init", "1-init.up.sql", "1-init.down.sql")).unwrap();
        record(&mut tx, &MigrationUnit::new(2, "add col", "2-add-col.up.sql", "2-add-col.down.sql"))
            .unwrap();

        assert_eq!(current_version(&mut tx).unwrap(), AppliedVersion::new(2, "add col"));
        assert_eq!(applied_versions(&mut tx).unwrap().len(), 2);
    }

    #[test]
    fn test_record_duplicate_fails() {
        let mut db = MemoryDb::new();
        let mut tx = db.begin();
        let unit = MigrationUnit::new(1, "init", "1-init.up.sql", "1-init.down.sql");
        record(&mut tx, &unit).unwrap();
        let err = record(&mut tx, &unit).unwrap_err();
        assert_eq!(err, MigrateError::DuplicateVersion { version: 1 });
    }

    #[test]
    fn test_unrecord_missing_is_noop() {
        let mut db = MemoryDb::new();
        let mut tx = db.begin();
        unrecord(&mut tx, 4).unwrap();

        let mut db = MemoryDb::new().with_bookkeeping();
        let mut tx = db.begin();
        unrecord(&mut tx, 4).unwrap();
    }
}
