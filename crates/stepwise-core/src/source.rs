//! Migration source seam
//!
//! Abstracts where forward-script references come from and how the text
//! behind a reference is read. The filesystem implementation lives in
//! `stepwise-store`; tests use in-memory sources.

use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Provider of migration scripts
pub trait MigrationSource {
    /// List every forward-script reference (`*.up.sql`)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying listing fails.
    fn discover(&self) -> Result<Vec<PathBuf>>;

    /// Read the statement text behind a script reference
    ///
    /// # Errors
    ///
    /// Returns `ScriptUnavailable` if the reference cannot be read.
    fn read_script(&self, reference: &Path) -> Result<String>;
}
