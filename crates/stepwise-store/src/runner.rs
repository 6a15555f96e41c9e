//! Migration runner
//!
//! Owns the transaction for one invocation: begin, hand it to the core
//! engine, commit on success. An error drops the transaction, which rolls
//! back every script and bookkeeping change made during the run.

use crate::db;
use crate::errors::Result;
use crate::sqlite::SqliteTx;
use rusqlite::Connection;
use stepwise_core::source::MigrationSource;
use stepwise_core::{tracker, AppliedVersion, Directive, MigrateOptions, MigrateOutcome, UnitStatus};

/// Run `directive` against `conn` as one all-or-nothing transaction
///
/// Foreign keys are not enforced while scripts run and are checked once
/// before commit; the connection's own setting is restored afterwards. Dry
/// runs are always rolled back.
///
/// # Errors
///
/// Any core error, `Persistence` if the transaction cannot be begun or
/// committed, or if the migrated schema leaves a foreign key dangling.
pub fn migrate(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    directive: Directive,
    options: &MigrateOptions,
) -> Result<MigrateOutcome> {
    let enforced = db::foreign_keys_enabled(conn)?;
    db::set_foreign_keys(conn, false)?;

    let result = migrate_in_tx(conn, source, directive, options);
    let restored = db::set_foreign_keys(conn, enforced);

    let outcome = result?;
    restored?;
    Ok(outcome)
}

fn migrate_in_tx(
    conn: &mut Connection,
    source: &dyn MigrationSource,
    directive: Directive,
    options: &MigrateOptions,
) -> Result<MigrateOutcome> {
    let mut tx = SqliteTx::begin(conn)?;
    let outcome = stepwise_core::run(&mut tx, source, directive, options)?;

    if outcome.dry_run {
        tx.rollback()?;
    } else {
        tx.check_foreign_keys()?;
        tx.commit()?;
    }
    Ok(outcome)
}

/// List every catalog unit with its applied flag; never writes
///
/// # Errors
///
/// Catalog or bookkeeping read errors.
pub fn status(conn: &mut Connection, source: &dyn MigrationSource) -> Result<Vec<UnitStatus>> {
    let mut tx = SqliteTx::begin(conn)?;
    let statuses = stepwise_core::status(&mut tx, source)?;
    tx.rollback()?;
    Ok(statuses)
}

/// Current applied state of `conn`
///
/// # Errors
///
/// `ReadFailure` if the bookkeeping table cannot be read.
pub fn current_version(conn: &mut Connection) -> Result<AppliedVersion> {
    let mut tx = SqliteTx::begin(conn)?;
    let current = tracker::current_version(&mut tx)?;
    tx.rollback()?;
    Ok(current)
}
