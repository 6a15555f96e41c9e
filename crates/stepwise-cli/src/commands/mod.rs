pub mod migrate;
pub mod status;

use stepwise_core::AppliedVersion;

/// Final report line
pub fn current_line(current: &AppliedVersion) -> String {
    format!("DB currently at v{}: {:?}", current.version, current.name)
}
