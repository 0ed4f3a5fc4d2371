//! Task store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Where the task database lives.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the libSQL database file. Empty = `<data dir>/taskbuddy.db`.
    #[serde(default)]
    pub db_path: String,
}

impl StoreConfig {
    /// Resolve the database path, falling back to `data_dir/taskbuddy.db`.
    ///
    /// `":memory:"` is passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnresolvedPath` if no path is configured and the
    /// data directory cannot be resolved.
    pub fn resolve_db_path(&self, data_dir: Option<&PathBuf>) -> Result<PathBuf, ConfigError> {
        if !self.db_path.is_empty() {
            return Ok(PathBuf::from(&self.db_path));
        }
        data_dir
            .map(|dir| dir.join("taskbuddy.db"))
            .ok_or_else(|| ConfigError::UnresolvedPath {
                field: "store.db_path".into(),
                reason: "home directory not found".into(),
            })
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_falls_back_to_data_dir() {
        let config = StoreConfig::default();
        let dir = PathBuf::from("/tmp/tb");
        let path = config.resolve_db_path(Some(&dir)).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/tb/taskbuddy.db"));
    }

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig {
            db_path: "/var/lib/tb.db".into(),
        };
        let path = config.resolve_db_path(None).unwrap();
        assert_eq!(path, PathBuf::from("/var/lib/tb.db"));
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        let config = StoreConfig::default();
        assert!(matches!(
            config.resolve_db_path(None),
            Err(ConfigError::UnresolvedPath { .. })
        ));
    }
}
