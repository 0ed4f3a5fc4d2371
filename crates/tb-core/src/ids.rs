//! ID prefix constants.
//!
//! IDs are formatted as `{prefix}-{8 lowercase hex chars}`, e.g. `tsk-a3f8b2c1`.

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_USER: &str = "usr";

pub const ALL_PREFIXES: [&str; 2] = [PREFIX_TASK, PREFIX_USER];

/// Format an ID from a prefix and four random bytes.
#[must_use]
pub fn format_id(prefix: &str, bytes: [u8; 4]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}-{hex}")
}
