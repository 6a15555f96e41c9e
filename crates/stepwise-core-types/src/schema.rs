//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Migration identifiers
pub const FIELD_VERSION: &str = "version";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DIRECTION: &str = "direction";

// Plan shape
pub const FIELD_FROM_VERSION: &str = "from_version";
pub const FIELD_TO_VERSION: &str = "to_version";
pub const FIELD_STEP_COUNT: &str = "step_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_STEP: &str = "step";

// Direction labels
pub const DIRECTION_FORWARD: &str = "forward";
pub const DIRECTION_BACKWARD: &str = "backward";
