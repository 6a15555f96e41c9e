//! Migration executor
//!
//! Runs a plan's scripts inside the caller's transaction and keeps the
//! bookkeeping table in step. The first failure stops the run; undoing the
//! steps already taken is left to the transaction owner.

use crate::errors::{MigrateError, Phase, Result};
use crate::model::{AppliedVersion, MigrationUnit};
use crate::planner::{Direction, Plan};
use crate::source::MigrationSource;
use crate::tracker;
use crate::tx::MigrationTx;
use stepwise_core_types::schema::EVENT_STEP;

/// Run `plan` in its direction, returning the units touched in run order
///
/// # Errors
///
/// See [`apply_all`] and [`revert_all`].
pub fn execute(
    plan: &Plan<'_>,
    tx: &mut dyn MigrationTx,
    source: &dyn MigrationSource,
) -> Result<Vec<AppliedVersion>> {
    match plan.direction() {
        Direction::Forward => apply_all(plan.units(), tx, source),
        Direction::Backward => revert_all(plan.units(), tx, source),
    }
}

/// Apply `units` in ascending order, recording each one
///
/// # Errors
///
/// - `ScriptUnavailable` if a forward script cannot be read
/// - `ExecutionFailure` if a forward script fails
/// - `DuplicateVersion` if the bookkeeping table already holds a version
pub fn apply_all(
    units: &[MigrationUnit],
    tx: &mut dyn MigrationTx,
    source: &dyn MigrationSource,
) -> Result<Vec<AppliedVersion>> {
    let mut done = Vec::with_capacity(units.len());
    for unit in units {
        announce(unit, Direction::Forward);
        let sql = source.read_script(unit.forward_script())?;
        tx.execute_batch(&sql)
            .map_err(|e| execution_failure(unit, Phase::Apply, e))?;
        tracker::record(tx, unit)?;
        done.push(unit.applied());
    }
    Ok(done)
}

/// Revert `units` in descending order, unrecording each one
///
/// `units` is given ascending, as planned. The bookkeeping row is only
/// removed while the table still exists, since the earliest unit's reverse
/// script may drop it.
///
/// # Errors
///
/// - `ScriptUnavailable` if a reverse script cannot be read
/// - `ExecutionFailure` if a reverse script fails
pub fn revert_all(
    units: &[MigrationUnit],
    tx: &mut dyn MigrationTx,
    source: &dyn MigrationSource,
) -> Result<Vec<AppliedVersion>> {
    let mut done = Vec::with_capacity(units.len());
    for unit in units.iter().rev() {
        announce(unit, Direction::Backward);
        let sql = source.read_script(unit.reverse_script())?;
        tx.execute_batch(&sql)
            .map_err(|e| execution_failure(unit, Phase::Revert, e))?;
        tracker::unrecord(tx, unit.version())?;
        done.push(unit.applied());
    }
    Ok(done)
}

fn announce(unit: &MigrationUnit, direction: Direction) {
    let verb = match direction {
        Direction::Forward => "Applying",
        Direction::Backward => "Reverting",
    };
    tracing::info!(
        component = module_path!(),
        op = "execute",
        event = EVENT_STEP,
        version = unit.version(),
        name = unit.name(),
        direction = direction.as_str(),
        "{} {}: {:?}",
        verb,
        unit.version(),
        unit.name()
    );
}

fn execution_failure(unit: &MigrationUnit, phase: Phase, err: MigrateError) -> MigrateError {
    let message = match err {
        MigrateError::Persistence { message, .. } => message,
        other => other.to_string(),
    };
    MigrateError::ExecutionFailure {
        version: unit.version(),
        name: unit.name().to_string(),
        phase,
        message,
    }
}
