//! Migration domain model

mod unit;

pub use unit::{AppliedVersion, MigrationUnit, UnitStatus};
