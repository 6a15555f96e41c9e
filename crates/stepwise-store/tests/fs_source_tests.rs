// Integration tests for filesystem discovery and configuration

use std::fs;
use stepwise_core::errors::MigrateError;
use stepwise_core::{Catalog, MigrationSource};
use stepwise_store::{FsMigrationSource, MigrateConfig};
use tempfile::TempDir;

#[test]
fn test_discover_walks_subdirectories() {
    // Given: Forward scripts at the top level and one level down
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("2024")).unwrap();
    fs::write(dir.path().join("1-init.up.sql"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("1-init.down.sql"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("2024").join("2-add-col.up.sql"), "SELECT 2;").unwrap();
    fs::write(dir.path().join("README.md"), "notes").unwrap();

    // When: We discover and build a catalog
    let source = FsMigrationSource::new(dir.path());
    let refs = source.discover().unwrap();
    let catalog = Catalog::build(refs.clone()).unwrap();

    // Then: Only forward scripts are found, in version order
    assert_eq!(refs.len(), 2);
    let versions: Vec<i64> = catalog.units().iter().map(|u| u.version()).collect();
    assert_eq!(versions, vec![1, 2]);
    assert!(catalog.units()[1]
        .reverse_script()
        .ends_with("2024/2-add-col.down.sql"));
}

#[test]
fn test_read_missing_script_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let source = FsMigrationSource::new(dir.path());

    let err = source
        .read_script(&dir.path().join("9-gone.down.sql"))
        .unwrap_err();

    assert!(matches!(err, MigrateError::ScriptUnavailable { .. }));
}

#[test]
fn test_discover_missing_directory_fails() {
    let source = FsMigrationSource::new("/definitely/not/a/migrations/dir");
    assert!(matches!(
        source.discover(),
        Err(MigrateError::ScriptUnavailable { .. })
    ));
}

#[test]
fn test_config_open_creates_database_file() {
    // Given: A valid migrations directory and a database path that does not exist yet
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("fresh.db");
    let config = MigrateConfig::new(&db_path, dir.path());

    // When: We open
    let (_conn, source) = config.open().unwrap();

    // Then: The file exists and the source points at the directory
    assert!(db_path.exists());
    assert_eq!(source.root(), dir.path());
}
