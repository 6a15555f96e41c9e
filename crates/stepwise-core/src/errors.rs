use stepwise_core_types::RunId;
use thiserror::Error;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that the CLI prints and tests
/// assert on. Several `MigrateError` variants may share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Catalog
    MalformedVersion,
    InvalidReference,
    DuplicateVersion,

    // Applied state
    ReadFailure,

    // Planning
    PlanOutOfRange,
    InvalidDirective,

    // Execution
    ExecutionFailure,

    // Configuration
    InvalidInput,

    // Integration/IO
    Io,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedVersion => "ERR_MALFORMED_VERSION",
            ExErrorKind::InvalidReference => "ERR_INVALID_REFERENCE",
            ExErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            ExErrorKind::ReadFailure => "ERR_READ_FAILURE",
            ExErrorKind::PlanOutOfRange => "ERR_PLAN_OUT_OF_RANGE",
            ExErrorKind::InvalidDirective => "ERR_INVALID_DIRECTIVE",
            ExErrorKind::ExecutionFailure => "ERR_EXECUTION_FAILURE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, unit, run) needed to report a failed invocation.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    version: Option<i64>,
    unit_name: Option<String>,
    reference: Option<String>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            unit_name: None,
            reference: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Add migration name context
    pub fn with_unit_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = Some(name.into());
        self
    }

    /// Add script reference context
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn unit_name(&self) -> Option<&str> {
        self.unit_name.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(name) = &self.unit_name {
            write!(f, " (name: {:?})", name)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, " (reference: {})", reference)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Which half of a migration unit was running when execution failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Apply,
    Revert,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Apply => write!(f, "apply"),
            Phase::Revert => write!(f, "revert"),
        }
    }
}

/// Error taxonomy for migration operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    // ===== Catalog Errors =====
    /// Leading token of a source file name is not a positive integer
    #[error("Malformed version in {reference}: {reason}")]
    MalformedVersion { reference: String, reason: String },

    /// Source reference does not follow the `<version>-<name>.up.sql` convention
    #[error("Invalid migration reference {reference}: {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Two source files claim the same version
    #[error("Version {version} is claimed by both {first} and {second}")]
    DuplicateCatalogVersion {
        version: i64,
        first: String,
        second: String,
    },

    // ===== Applied State Errors =====
    /// Bookkeeping insert collided with an existing row
    #[error("Version {version} is already recorded as applied")]
    DuplicateVersion { version: i64 },

    /// Bookkeeping query failed for a reason other than absence
    #[error("Failed to read applied migrations: {message}")]
    ReadFailure { message: String },

    // ===== Planning Errors =====
    /// Requested delta falls outside the catalog
    #[error("{directive} is out of range at version {current}: {reason}")]
    PlanOutOfRange {
        directive: String,
        current: i64,
        reason: String,
    },

    /// Directive is missing, ambiguous or carries an invalid argument
    #[error("Invalid directive: {reason}")]
    InvalidDirective { reason: String },

    // ===== Execution Errors =====
    /// A forward or reverse script failed against the database
    #[error("Failed to {phase} migration {version} ({name:?}): {message}")]
    ExecutionFailure {
        version: i64,
        name: String,
        phase: Phase,
        message: String,
    },

    /// A script reference could not be read
    #[error("Script {path} could not be read: {message}")]
    ScriptUnavailable { path: String, message: String },

    // ===== Collaborator Errors =====
    /// Configuration could not be resolved into usable values
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// Database failure outside of script execution (begin, commit, bookkeeping write)
    #[error("Database failure during {op}: {message}")]
    Persistence { op: String, message: String },
}

impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        let message = err.to_string();
        match err {
            MigrateError::MalformedVersion { reference, .. } => {
                ExError::new(ExErrorKind::MalformedVersion)
                    .with_op("build_catalog")
                    .with_reference(reference)
                    .with_message(message)
            }
            MigrateError::InvalidReference { reference, .. } => {
                ExError::new(ExErrorKind::InvalidReference)
                    .with_op("build_catalog")
                    .with_reference(reference)
                    .with_message(message)
            }
            MigrateError::DuplicateCatalogVersion { version, first, .. } => {
                ExError::new(ExErrorKind::DuplicateVersion)
                    .with_op("build_catalog")
                    .with_version(version)
                    .with_reference(first)
                    .with_message(message)
            }
            MigrateError::DuplicateVersion { version } => {
                ExError::new(ExErrorKind::DuplicateVersion)
                    .with_op("record")
                    .with_version(version)
                    .with_message(message)
            }
            MigrateError::ReadFailure { .. } => ExError::new(ExErrorKind::ReadFailure)
                .with_op("current_version")
                .with_message(message),
            MigrateError::PlanOutOfRange { current, .. } => {
                ExError::new(ExErrorKind::PlanOutOfRange)
                    .with_op("plan")
                    .with_version(current)
                    .with_message(message)
            }
            MigrateError::InvalidDirective { .. } => ExError::new(ExErrorKind::InvalidDirective)
                .with_op("directive")
                .with_message(message),
            MigrateError::ExecutionFailure {
                version,
                name,
                phase,
                ..
            } => ExError::new(ExErrorKind::ExecutionFailure)
                .with_op(phase.to_string())
                .with_version(version)
                .with_unit_name(name)
                .with_message(message),
            MigrateError::ScriptUnavailable { path, .. } => ExError::new(ExErrorKind::Io)
                .with_op("read_script")
                .with_reference(path)
                .with_message(message),
            MigrateError::Config { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("config")
                .with_message(message),
            MigrateError::Persistence { op, .. } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),
        }
    }
}
