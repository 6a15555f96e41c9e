use stepwise_core::errors::{ExError, ExErrorKind, MigrateError, Phase};

#[test]
fn test_malformed_version_verifiable_by_kind() {
    let err = MigrateError::MalformedVersion {
        reference: "migrations/abc-init.up.sql".to_string(),
        reason: "'abc' is not an integer".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MalformedVersion);
    assert_eq!(ex_err.code(), "ERR_MALFORMED_VERSION");
    assert_eq!(ex_err.reference(), Some("migrations/abc-init.up.sql"));
    assert_eq!(ex_err.op(), Some("build_catalog"));
}

#[test]
fn test_catalog_and_ledger_duplicates_share_a_kind() {
    let catalog: ExError = MigrateError::DuplicateCatalogVersion {
        version: 4,
        first: "4-a.up.sql".to_string(),
        second: "4-b.up.sql".to_string(),
    }
    .into();
    let ledger: ExError = MigrateError::DuplicateVersion { version: 4 }.into();

    assert_eq!(catalog.kind(), ExErrorKind::DuplicateVersion);
    assert_eq!(ledger.kind(), ExErrorKind::DuplicateVersion);
    assert_ne!(catalog.op(), ledger.op());
    assert_eq!(ledger.version(), Some(4));
}

#[test]
fn test_execution_failure_names_unit_and_phase() {
    let err = MigrateError::ExecutionFailure {
        version: 2,
        name: "add col".to_string(),
        phase: Phase::Revert,
        message: "no such column: email".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Failed to revert migration 2 (\"add col\"): no such column: email"
    );

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::ExecutionFailure);
    assert_eq!(ex_err.op(), Some("revert"));
    assert_eq!(ex_err.version(), Some(2));
    assert_eq!(ex_err.unit_name(), Some("add col"));
}

#[test]
fn test_plan_out_of_range_carries_current_version() {
    let ex_err: ExError = MigrateError::PlanOutOfRange {
        directive: "down 5".to_string(),
        current: 3,
        reason: "only 3 applied migration(s)".to_string(),
    }
    .into();

    assert_eq!(ex_err.code(), "ERR_PLAN_OUT_OF_RANGE");
    assert_eq!(ex_err.version(), Some(3));
    assert!(ex_err.message().contains("down 5"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::MalformedVersion, "ERR_MALFORMED_VERSION"),
        (ExErrorKind::InvalidReference, "ERR_INVALID_REFERENCE"),
        (ExErrorKind::DuplicateVersion, "ERR_DUPLICATE_VERSION"),
        (ExErrorKind::ReadFailure, "ERR_READ_FAILURE"),
        (ExErrorKind::PlanOutOfRange, "ERR_PLAN_OUT_OF_RANGE"),
        (ExErrorKind::InvalidDirective, "ERR_INVALID_DIRECTIVE"),
        (ExErrorKind::ExecutionFailure, "ERR_EXECUTION_FAILURE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_script_unavailable_maps_to_io() {
    let ex_err: ExError = MigrateError::ScriptUnavailable {
        path: "1-init.down.sql".to_string(),
        message: "No such file or directory".to_string(),
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::Io);
    assert_eq!(ex_err.reference(), Some("1-init.down.sql"));
}
