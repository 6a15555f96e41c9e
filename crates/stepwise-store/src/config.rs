//! Resolved configuration for one invocation
//!
//! The CLI resolves flags, environment and `.env` into a `MigrateConfig`;
//! nothing below this point reads the process environment.

use crate::db;
use crate::errors::{config_error, Result};
use crate::source::FsMigrationSource;
use rusqlite::Connection;
use std::path::PathBuf;

/// Database location and migration directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    pub database_path: PathBuf,
    pub migrations_dir: PathBuf,
}

impl MigrateConfig {
    pub fn new(database_path: impl Into<PathBuf>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            migrations_dir: migrations_dir.into(),
        }
    }

    /// Check that the values can be used before any connection is opened
    ///
    /// # Errors
    ///
    /// `Config` if the database path is empty or the migrations directory
    /// does not exist
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(config_error("database path is empty"));
        }
        if !self.migrations_dir.is_dir() {
            return Err(config_error(format!(
                "migrations directory {} does not exist",
                self.migrations_dir.display()
            )));
        }
        Ok(())
    }

    /// Validate, then open and configure the database and build the source
    ///
    /// # Errors
    ///
    /// `Config` from [`MigrateConfig::validate`] or `Persistence` if the
    /// database cannot be opened
    pub fn open(&self) -> Result<(Connection, FsMigrationSource)> {
        self.validate()?;
        let conn = db::open(&self.database_path)?;
        db::configure(&conn)?;
        Ok((conn, FsMigrationSource::new(&self.migrations_dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_core::errors::MigrateError;

    #[test]
    fn test_missing_dir_is_config_error() {
        let config = MigrateConfig::new("db.sqlite", "/definitely/not/here");
        assert!(matches!(config.validate(), Err(MigrateError::Config { .. })));
    }

    #[test]
    fn test_empty_database_path_is_config_error() {
        let config = MigrateConfig::new("", ".");
        assert!(matches!(config.validate(), Err(MigrateError::Config { .. })));
    }
}
