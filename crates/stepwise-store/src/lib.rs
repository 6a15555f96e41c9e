//! stepwise store - SQLite and filesystem collaborators
//!
//! Provides:
//! - Connection management for SQLite databases
//! - `SqliteTx`, the rusqlite-backed `MigrationTx`
//! - `FsMigrationSource`, which discovers `*.up.sql` files under a directory
//! - The transactional runner that commits or rolls back one invocation
//! - `MigrateConfig`, the resolved configuration handed in by the CLI

pub mod config;
pub mod db;
pub mod errors;
pub mod runner;
pub mod source;
pub mod sqlite;

// Re-export key types
pub use config::MigrateConfig;
pub use errors::Result;
pub use source::FsMigrationSource;
pub use sqlite::SqliteTx;
