//! Apply/revert command

use super::current_line;
use stepwise_core::errors::{ExError, MigrateError};
use stepwise_core::{Directive, DirectiveFlags, Direction, MigrateOptions};
use stepwise_core_types::RunId;
use stepwise_store::{runner, MigrateConfig};

/// Run one directive; errors carry the run id that tagged its log lines
pub fn execute(
    config: &MigrateConfig,
    flags: &DirectiveFlags,
    dry_run: bool,
) -> Result<(), ExError> {
    let run_id = RunId::new();
    let tag = |e: MigrateError| ExError::from(e).with_run_id(run_id.clone());

    let directive = Directive::from_flags(flags).map_err(tag)?;
    let (mut conn, source) = config.open().map_err(tag)?;

    let options = MigrateOptions {
        dry_run,
        run_id: Some(run_id.clone()),
    };
    let outcome = runner::migrate(&mut conn, &source, directive, &options).map_err(tag)?;

    if outcome.dry_run {
        let verb = match outcome.direction {
            Some(Direction::Backward) => "revert",
            _ => "apply",
        };
        for step in &outcome.steps {
            println!("Would {} {}: {:?}", verb, step.version, step.name);
        }
        println!("{}", current_line(&outcome.before));
        println!(
            "Dry run: DB would be at v{}: {:?}",
            outcome.after.version, outcome.after.name
        );
    } else {
        println!("{}", current_line(&outcome.after));
    }
    Ok(())
}
