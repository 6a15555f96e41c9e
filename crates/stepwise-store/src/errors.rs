//! Error handling for stepwise-store
//!
//! Converts rusqlite and IO failures into the core `MigrateError` taxonomy

use rusqlite::ErrorCode;
use std::path::Path;
use stepwise_core::errors::MigrateError;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> MigrateError {
    persistence("sqlite", err)
}

/// Create a database error tagged with the operation that failed
pub fn persistence(op: &str, err: rusqlite::Error) -> MigrateError {
    MigrateError::Persistence {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Create a bookkeeping read error
pub fn read_failure(err: rusqlite::Error) -> MigrateError {
    MigrateError::ReadFailure {
        message: err.to_string(),
    }
}

/// Map a bookkeeping insert failure, surfacing key collisions as duplicates
pub fn insert_failure(version: i64, err: rusqlite::Error) -> MigrateError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
            MigrateError::DuplicateVersion { version }
        }
        other => persistence("record", other),
    }
}

/// Create an IO error for a script or directory
pub fn io_error(path: &Path, err: std::io::Error) -> MigrateError {
    MigrateError::ScriptUnavailable {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Create an error for a row left pointing at a missing parent
pub fn foreign_key_violation(table: &str, rowid: Option<i64>, parent: &str) -> MigrateError {
    let row = rowid.map_or_else(|| "a row".to_string(), |id| format!("row {}", id));
    MigrateError::Persistence {
        op: "foreign_key_check".to_string(),
        message: format!(
            "{} of table {} references a missing row in {}",
            row, table, parent
        ),
    }
}

/// Create a configuration error
pub fn config_error(reason: impl Into<String>) -> MigrateError {
    MigrateError::Config {
        reason: reason.into(),
    }
}
