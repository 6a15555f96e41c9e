//! Migration catalog
//!
//! Turns discovered forward-script references into the version-ordered set
//! of migration units for one invocation.
//!
//! Naming convention: `<version>-<name-tokens...>.up.sql`, with the reverse
//! script living next to it as `<version>-<name-tokens...>.down.sql`.

use crate::errors::{MigrateError, Result};
use crate::model::MigrationUnit;
use std::path::Path;

/// Marker that identifies a forward script
pub const FORWARD_MARKER: &str = "up.sql";
/// Marker that identifies a reverse script
pub const REVERSE_MARKER: &str = "down.sql";

const TOKEN_SEPARATOR: char = '-';
const SQL_SUFFIX: &str = ".sql";

/// Totally ordered, duplicate-free list of migration units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    units: Vec<MigrationUnit>,
}

impl Catalog {
    /// Build a catalog from forward-script references
    ///
    /// # Errors
    ///
    /// - `MalformedVersion` if a file name does not start with a positive integer
    /// - `InvalidReference` if a reference has no file name or no `up.sql` marker
    /// - `DuplicateCatalogVersion` if two references share a version
    pub fn build<I, P>(refs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let units = refs
            .into_iter()
            .map(|r| parse_reference(r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_units(units)
    }

    /// Order already-constructed units, rejecting duplicate versions
    ///
    /// # Errors
    ///
    /// `DuplicateCatalogVersion` if two units share a version
    pub fn from_units(mut units: Vec<MigrationUnit>) -> Result<Self> {
        units.sort_by_key(MigrationUnit::version);

        if let Some(pair) = units
            .windows(2)
            .find(|pair| pair[0].version() == pair[1].version())
        {
            return Err(MigrateError::DuplicateCatalogVersion {
                version: pair[0].version(),
                first: pair[0].forward_script().display().to_string(),
                second: pair[1].forward_script().display().to_string(),
            });
        }

        Ok(Self { units })
    }

    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look a unit up by version value
    pub fn get(&self, version: i64) -> Option<&MigrationUnit> {
        self.units
            .binary_search_by_key(&version, MigrationUnit::version)
            .ok()
            .map(|idx| &self.units[idx])
    }

    pub fn contains(&self, version: i64) -> bool {
        self.get(version).is_some()
    }

    /// Number of leading units whose version is at most `version`
    ///
    /// For the current applied version this is the count of units already
    /// applied; for a contiguous `1..N` catalog it equals `version` itself.
    pub fn applied_prefix(&self, version: i64) -> usize {
        self.units.partition_point(|u| u.version() <= version)
    }

    /// Highest-versioned unit, if any
    pub fn latest(&self) -> Option<&MigrationUnit> {
        self.units.last()
    }
}

/// Parse a single forward-script reference into a migration unit
///
/// # Errors
///
/// See [`Catalog::build`].
pub fn parse_reference(reference: &Path) -> Result<MigrationUnit> {
    let display = reference.display().to_string();
    let file_name = reference
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| MigrateError::InvalidReference {
            reference: display.clone(),
            reason: "no UTF-8 file name".to_string(),
        })?;

    let mut tokens = file_name.split(TOKEN_SEPARATOR);
    let version_token = tokens.next().unwrap_or_default();
    let version: i64 = version_token
        .parse()
        .map_err(|_| MigrateError::MalformedVersion {
            reference: display.clone(),
            reason: format!("'{}' is not an integer", version_token),
        })?;
    if version <= 0 {
        return Err(MigrateError::MalformedVersion {
            reference: display,
            reason: format!("version {} must be positive", version),
        });
    }

    if !file_name.contains(FORWARD_MARKER) {
        return Err(MigrateError::InvalidReference {
            reference: display,
            reason: format!("file name does not contain '{}'", FORWARD_MARKER),
        });
    }

    let name = name_from_tokens(tokens);
    let reverse_name = file_name.replacen(FORWARD_MARKER, REVERSE_MARKER, 1);

    Ok(MigrationUnit::new(
        version,
        name,
        reference,
        reference.with_file_name(reverse_name),
    ))
}

/// Join the tokens after the version up to the one carrying `.sql`,
/// keeping only the stem of that last token
fn name_from_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let mut name = Vec::new();
    for token in tokens {
        if token.contains(SQL_SUFFIX) {
            name.push(token.split('.').next().unwrap_or_default());
            break;
        }
        name.push(token);
    }
    name.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_reference_fields() {
        let unit = parse_reference(Path::new("db/3-add-user-index.up.sql")).unwrap();
        assert_eq!(unit.version(), 3);
        assert_eq!(unit.name(), "add user index");
        assert_eq!(unit.forward_script(), Path::new("db/3-add-user-index.up.sql"));
        assert_eq!(
            unit.reverse_script(),
            Path::new("db/3-add-user-index.down.sql")
        );
    }

    #[test]
    fn test_single_token_name() {
        let unit = parse_reference(Path::new("1-init.up.sql")).unwrap();
        assert_eq!(unit.name(), "init");
    }

    #[test]
    fn test_leading_zeros_parse() {
        let unit = parse_reference(Path::new("0007-seed.up.sql")).unwrap();
        assert_eq!(unit.version(), 7);
    }

    #[test]
    fn test_marker_in_directory_is_left_alone() {
        let unit = parse_reference(Path::new("setup.sql.d/2-users.up.sql")).unwrap();
        assert_eq!(
            unit.reverse_script(),
            Path::new("setup.sql.d/2-users.down.sql")
        );
    }

    #[test]
    fn test_non_integer_version_is_malformed() {
        let err = parse_reference(Path::new("init-users.up.sql")).unwrap_err();
        assert!(matches!(err, MigrateError::MalformedVersion { .. }));
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        let err = parse_reference(Path::new("1.up.sql")).unwrap_err();
        assert!(matches!(err, MigrateError::MalformedVersion { .. }));
    }

    #[test]
    fn test_zero_version_is_malformed() {
        let err = parse_reference(Path::new("0-bootstrap.up.sql")).unwrap_err();
        assert!(matches!(err, MigrateError::MalformedVersion { .. }));
    }

    #[test]
    fn test_reverse_script_reference_is_invalid() {
        let err = parse_reference(Path::new("1-init.down.sql")).unwrap_err();
        assert!(matches!(err, MigrateError::InvalidReference { .. }));
    }

    #[test]
    fn test_build_sorts_by_version() {
        let catalog = Catalog::build([
            "10-ten.up.sql",
            "2-two.up.sql",
            "1-one.up.sql",
        ])
        .unwrap();

        let versions: Vec<i64> = catalog.units().iter().map(|u| u.version()).collect();
        assert_eq!(versions, vec![1, 2, 10]);
    }

    #[test]
    fn test_build_rejects_duplicate_versions() {
        let err = Catalog::build([PathBuf::from("2-a.up.sql"), PathBuf::from("2-b.up.sql")])
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::DuplicateCatalogVersion { version: 2, .. }
        ));
    }

    #[test]
    fn test_applied_prefix_by_value() {
        let catalog = Catalog::build(["1-a.up.sql", "5-b.up.sql", "9-c.up.sql"]).unwrap();
        assert_eq!(catalog.applied_prefix(0), 0);
        assert_eq!(catalog.applied_prefix(1), 1);
        assert_eq!(catalog.applied_prefix(5), 2);
        assert_eq!(catalog.applied_prefix(9), 3);
        assert!(catalog.contains(5));
        assert!(!catalog.contains(4));
        assert_eq!(catalog.latest().map(|u| u.version()), Some(9));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::build(Vec::<PathBuf>::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.applied_prefix(3), 0);
    }
}
