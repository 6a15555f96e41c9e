//! In-memory collaborators
//!
//! `MemoryDb` and `MemorySource` implement the two seams without SQLite or a
//! filesystem. Scripts are opaque: executing one appends its text to a
//! journal. A `MemoryTx` only touches the database when committed, so
//! dropping it behaves like a rollback.

use crate::errors::{MigrateError, Result};
use crate::model::AppliedVersion;
use crate::source::MigrationSource;
use crate::tx::MigrationTx;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
struct State {
    ledger: Option<BTreeMap<i64, String>>,
    journal: Vec<String>,
}

/// Committed database state
#[derive(Debug, Default)]
pub struct MemoryDb {
    state: State,
    failing: HashSet<String>,
    transactional_ddl: bool,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self {
            transactional_ddl: true,
            ..Default::default()
        }
    }

    /// Start with an empty bookkeeping table already present
    pub fn with_bookkeeping(mut self) -> Self {
        self.state.ledger = Some(BTreeMap::new());
        self
    }

    /// Make any script with exactly this text fail
    pub fn fail_on(mut self, script: impl Into<String>) -> Self {
        self.failing.insert(script.into());
        self
    }

    /// Report schema statements as non-transactional
    pub fn without_transactional_ddl(mut self) -> Self {
        self.transactional_ddl = false;
        self
    }

    pub fn begin(&mut self) -> MemoryTx<'_> {
        let pending = self.state.clone();
        MemoryTx { db: self, pending }
    }

    pub fn has_bookkeeping(&self) -> bool {
        self.state.ledger.is_some()
    }

    /// Committed bookkeeping rows in ascending order
    pub fn applied(&self) -> Vec<AppliedVersion> {
        self.state
            .ledger
            .iter()
            .flatten()
            .map(|(v, n)| AppliedVersion::new(*v, n.clone()))
            .collect()
    }

    /// Committed script texts in execution order
    pub fn journal(&self) -> &[String] {
        &self.state.journal
    }
}

/// Open transaction over a `MemoryDb`
pub struct MemoryTx<'db> {
    db: &'db mut MemoryDb,
    pending: State,
}

impl MemoryTx<'_> {
    pub fn commit(self) {
        self.db.state = self.pending;
    }

    /// Script texts executed so far in this transaction
    pub fn journal(&self) -> &[String] {
        &self.pending.journal
    }
}

impl MigrationTx for MemoryTx<'_> {
    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        if self.db.failing.contains(sql) {
            return Err(MigrateError::Persistence {
                op: "execute".to_string(),
                message: format!("script rejected: {}", sql),
            });
        }
        self.pending.journal.push(sql.to_string());
        Ok(())
    }

    fn bookkeeping_exists(&mut self) -> Result<bool> {
        Ok(self.pending.ledger.is_some())
    }

    fn ensure_bookkeeping(&mut self) -> Result<()> {
        self.pending.ledger.get_or_insert_with(BTreeMap::new);
        Ok(())
    }

    fn latest_applied(&mut self) -> Result<Option<AppliedVersion>> {
        Ok(self
            .pending
            .ledger
            .iter()
            .flatten()
            .next_back()
            .map(|(v, n)| AppliedVersion::new(*v, n.clone())))
    }

    fn list_applied(&mut self) -> Result<Vec<AppliedVersion>> {
        Ok(self
            .pending
            .ledger
            .iter()
            .flatten()
            .map(|(v, n)| AppliedVersion::new(*v, n.clone()))
            .collect())
    }

    fn insert_applied(&mut self, record: &AppliedVersion) -> Result<()> {
        let ledger = self.pending.ledger.as_mut().ok_or_else(|| MigrateError::Persistence {
            op: "record".to_string(),
            message: "no such table: migrations".to_string(),
        })?;
        if ledger.contains_key(&record.version) {
            return Err(MigrateError::DuplicateVersion {
                version: record.version,
            });
        }
        ledger.insert(record.version, record.name.clone());
        Ok(())
    }

    fn delete_applied(&mut self, version: i64) -> Result<()> {
        if let Some(ledger) = self.pending.ledger.as_mut() {
            ledger.remove(&version);
        }
        Ok(())
    }

    fn supports_transactional_ddl(&self) -> bool {
        self.db.transactional_ddl
    }
}

/// Scripts keyed by reference
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: BTreeMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit as `<version>-<slug>.up.sql` / `.down.sql`
    pub fn with_unit(mut self, version: i64, slug: &str, up: &str, down: &str) -> Self {
        self.scripts
            .insert(PathBuf::from(format!("{}-{}.up.sql", version, slug)), up.to_string());
        self.scripts.insert(
            PathBuf::from(format!("{}-{}.down.sql", version, slug)),
            down.to_string(),
        );
        self
    }

    /// Add a single script under an arbitrary reference
    pub fn with_script(mut self, reference: impl Into<PathBuf>, text: &str) -> Self {
        self.scripts.insert(reference.into(), text.to_string());
        self
    }
}

impl MigrationSource for MemorySource {
    fn discover(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .scripts
            .keys()
            .filter(|p| p.to_string_lossy().contains(".up.sql"))
            .cloned()
            .collect())
    }

    fn read_script(&self, reference: &Path) -> Result<String> {
        self.scripts
            .get(reference)
            .cloned()
            .ok_or_else(|| MigrateError::ScriptUnavailable {
                path: reference.display().to_string(),
                message: "not found".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let mut db = MemoryDb::new();
        {
            let mut tx = db.begin();
            tx.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
            tx.ensure_bookkeeping().unwrap();
        }
        assert!(db.journal().is_empty());
        assert!(!db.has_bookkeeping());
    }

    #[test]
    fn test_commit_persists() {
        let mut db = MemoryDb::new();
        let mut tx = db.begin();
        tx.ensure_bookkeeping().unwrap();
        tx.insert_applied(&AppliedVersion::new(1, "init")).unwrap();
        tx.commit();
        assert_eq!(db.applied(), vec![AppliedVersion::new(1, "init")]);
    }

    #[test]
    fn test_source_discovers_forward_scripts_only() {
        let source = MemorySource::new().with_unit(1, "init", "up", "down");
        let refs = source.discover().unwrap();
        assert_eq!(refs, vec![PathBuf::from("1-init.up.sql")]);
        assert_eq!(source.read_script(Path::new("1-init.down.sql")).unwrap(), "down");
    }
}
