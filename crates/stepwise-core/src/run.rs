//! Invocation orchestration
//!
//! One call to [`run`] is one invocation: discover, catalog, read current
//! version, plan, execute, re-read. The caller supplies the open
//! transaction and decides whether to commit.

use crate::catalog::Catalog;
use crate::directive::Directive;
use crate::errors::Result;
use crate::executor;
use crate::model::{AppliedVersion, UnitStatus};
use crate::planner::{self, Direction};
use crate::source::MigrationSource;
use crate::tracker;
use crate::tx::MigrationTx;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::HashSet;
use std::time::Instant;
use stepwise_core_types::RunId;

/// Per-invocation options
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Plan only; no script is executed
    pub dry_run: bool,
    /// Correlation id for log lines; generated when absent
    pub run_id: Option<RunId>,
}

/// What an invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOutcome {
    pub run_id: RunId,
    pub directive: Directive,
    /// `None` when the plan was empty
    pub direction: Option<Direction>,
    pub before: AppliedVersion,
    /// Re-read after execution; for dry runs, the state the plan would reach
    pub after: AppliedVersion,
    /// Units in the order they ran (or would run)
    pub steps: Vec<AppliedVersion>,
    pub dry_run: bool,
}

impl MigrateOutcome {
    pub fn changed(&self) -> bool {
        !self.steps.is_empty() && !self.dry_run
    }
}

/// Run `directive` inside `tx`
///
/// Nothing is committed here; on error the caller drops the transaction.
///
/// # Errors
///
/// Any catalog, tracker, planning or execution error, unchanged.
pub fn run(
    tx: &mut dyn MigrationTx,
    source: &dyn MigrationSource,
    directive: Directive,
    options: &MigrateOptions,
) -> Result<MigrateOutcome> {
    let run_id = options.run_id.clone().unwrap_or_default();
    let start = Instant::now();
    log_op_start!(
        "migrate",
        run_id = run_id.as_str(),
        directive = %directive,
        dry_run = options.dry_run
    );

    let result = run_inner(tx, source, directive, options, run_id.clone());
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            log_op_end!(
                "migrate",
                duration_ms = duration_ms,
                run_id = run_id.as_str(),
                from_version = outcome.before.version,
                to_version = outcome.after.version,
                step_count = outcome.steps.len()
            );
        }
        Err(err) => {
            log_op_error!(
                "migrate",
                err.clone(),
                duration_ms = duration_ms,
                run_id = run_id.as_str()
            );
        }
    }
    result
}

fn run_inner(
    tx: &mut dyn MigrationTx,
    source: &dyn MigrationSource,
    directive: Directive,
    options: &MigrateOptions,
    run_id: RunId,
) -> Result<MigrateOutcome> {
    let catalog = Catalog::build(source.discover()?)?;
    let before = tracker::current_version(tx)?;
    tracing::debug!(
        catalog_len = catalog.len(),
        current = before.version,
        "catalog built"
    );

    let plan = planner::plan(&catalog, before.version, directive)?;
    let direction = (!plan.is_empty()).then(|| plan.direction());

    if options.dry_run {
        let after = catalog
            .get(plan.to_version())
            .map(|u| u.applied())
            .unwrap_or_else(AppliedVersion::none);
        return Ok(MigrateOutcome {
            run_id,
            directive,
            direction,
            before,
            after,
            steps: plan.execution_order().map(|u| u.applied()).collect(),
            dry_run: true,
        });
    }

    if !plan.is_empty() && !tx.supports_transactional_ddl() {
        tracing::warn!(
            component = module_path!(),
            op = "migrate",
            run_id = run_id.as_str(),
            "database does not roll back schema statements; a failing unit may be partially applied"
        );
    }

    let steps = executor::execute(&plan, tx, source)?;
    let after = tracker::current_version(tx)?;

    Ok(MigrateOutcome {
        run_id,
        directive,
        direction,
        before,
        after,
        steps,
        dry_run: false,
    })
}

/// Every catalog unit with whether it is recorded as applied
///
/// # Errors
///
/// Catalog and tracker errors, unchanged.
pub fn status(tx: &mut dyn MigrationTx, source: &dyn MigrationSource) -> Result<Vec<UnitStatus>> {
    let catalog = Catalog::build(source.discover()?)?;
    let applied: HashSet<i64> = tracker::applied_versions(tx)?
        .into_iter()
        .map(|a| a.version)
        .collect();

    Ok(catalog
        .units()
        .iter()
        .map(|unit| UnitStatus {
            applied: applied.contains(&unit.version()),
            unit: unit.clone(),
        })
        .collect())
}
