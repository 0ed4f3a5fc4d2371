//! General application configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between checks for writes made by other processes.
const fn default_watch_interval_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Override for the data directory (database and session file).
    /// Empty = `~/.taskbuddy`.
    #[serde(default)]
    pub data_dir: String,

    /// Keep `taskbuddy board` running and print every snapshot.
    #[serde(default)]
    pub watch: bool,

    /// How often a watching board checks the database for writes made by
    /// other `taskbuddy` processes, in milliseconds.
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            watch: false,
            watch_interval_ms: default_watch_interval_ms(),
        }
    }
}

impl GeneralConfig {
    /// Poll period for external writes. Zero is raised to one millisecond.
    #[must_use]
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(1))
    }
}
