//! stepwise core - Versioned migration ordering and apply/revert engine
//!
//! This crate provides the storage-agnostic half of stepwise:
//! - Migration unit model and the version-ordered catalog
//! - Applied-state tracking over the bookkeeping table
//! - Directive validation and delta planning
//! - Transactional execution of a plan through the `MigrationTx` seam
//! - The structured error and logging facilities shared by every crate
//!
//! SQLite and filesystem collaborators live in `stepwise-store`.

pub mod catalog;
pub mod directive;
pub mod errors;
pub mod executor;
pub mod logging_facility;
pub mod memory;
pub mod model;
pub mod planner;
pub mod run;
pub mod source;
pub mod tracker;
pub mod tx;

// Re-export commonly used types
pub use catalog::Catalog;
pub use directive::{Directive, DirectiveFlags};
pub use errors::{ExError, ExErrorKind, MigrateError, Phase, Result};
pub use model::{AppliedVersion, MigrationUnit, UnitStatus};
pub use planner::{plan, Direction, Plan};
pub use run::{run, status, MigrateOptions, MigrateOutcome};
pub use source::MigrationSource;
pub use tx::MigrationTx;
