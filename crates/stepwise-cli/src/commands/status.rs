//! Status command

use super::current_line;
use stepwise_core::errors::ExError;
use stepwise_store::{runner, MigrateConfig};

pub fn execute(config: &MigrateConfig) -> Result<(), ExError> {
    let (mut conn, source) = config.open()?;
    let statuses = runner::status(&mut conn, &source)?;
    let current = runner::current_version(&mut conn)?;

    for status in &statuses {
        let mark = if status.applied { "x" } else { " " };
        println!(
            "[{}] {} {:?}",
            mark,
            status.unit.version(),
            status.unit.name()
        );
    }
    println!("{}", current_line(&current));
    Ok(())
}
