//! Filesystem migration source
//!
//! Walks a migrations directory (recursively) for forward scripts and
//! reads script text from disk.

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use stepwise_core::source::MigrationSource;

const FORWARD_SUFFIX: &str = ".up.sql";

/// Migration scripts stored under one directory
#[derive(Debug, Clone)]
pub struct FsMigrationSource {
    root: PathBuf,
}

impl FsMigrationSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(&self, dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
            let path = entry.map_err(|e| io_error(dir, e))?.path();
            if path.is_dir() {
                self.walk(&path, found)?;
            } else if path.to_string_lossy().contains(FORWARD_SUFFIX) {
                found.push(path);
            }
        }
        Ok(())
    }
}

impl MigrationSource for FsMigrationSource {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        self.walk(&self.root, &mut found)?;
        // Sorted for deterministic logs; ordering by version is the catalog's job
        found.sort();
        tracing::debug!(
            root = %self.root.display(),
            count = found.len(),
            "discovered forward scripts"
        );
        Ok(found)
    }

    fn read_script(&self, reference: &Path) -> Result<String> {
        fs::read_to_string(reference).map_err(|e| io_error(reference, e))
    }
}
