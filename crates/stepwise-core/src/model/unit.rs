use std::path::{Path, PathBuf};

/// One versioned, named pair of forward/reverse schema-change scripts
///
/// Built once per invocation by the catalog and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    version: i64,
    name: String,
    forward_script: PathBuf,
    reverse_script: PathBuf,
}

impl MigrationUnit {
    pub fn new(
        version: i64,
        name: impl Into<String>,
        forward_script: impl Into<PathBuf>,
        reverse_script: impl Into<PathBuf>,
    ) -> Self {
        Self {
            version,
            name: name.into(),
            forward_script: forward_script.into(),
            reverse_script: reverse_script.into(),
        }
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn forward_script(&self) -> &Path {
        &self.forward_script
    }

    pub fn reverse_script(&self) -> &Path {
        &self.reverse_script
    }

    /// The bookkeeping row this unit produces once applied
    pub fn applied(&self) -> AppliedVersion {
        AppliedVersion::new(self.version, self.name.clone())
    }
}

/// A row of the bookkeeping table
///
/// `AppliedVersion::none()` (version 0, empty name) stands for "nothing
/// applied yet", whether the table is empty or missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppliedVersion {
    pub version: i64,
    pub name: String,
}

impl AppliedVersion {
    pub fn new(version: i64, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
        }
    }

    /// Sentinel for an untouched database
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.version == 0
    }
}

impl std::fmt::Display for AppliedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}: {:?}", self.version, self.name)
    }
}

/// Catalog unit paired with whether the bookkeeping table lists it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub unit: MigrationUnit,
    pub applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        let none = AppliedVersion::none();
        assert!(none.is_none());
        assert_eq!(none, AppliedVersion::new(0, ""));
    }

    #[test]
    fn test_applied_mirrors_unit() {
        let unit = MigrationUnit::new(2, "add col", "2-add-col.up.sql", "2-add-col.down.sql");
        assert_eq!(unit.applied(), AppliedVersion::new(2, "add col"));
    }

    #[test]
    fn test_display_matches_report_format() {
        assert_eq!(AppliedVersion::new(3, "add index").to_string(), "v3: \"add index\"");
    }
}
