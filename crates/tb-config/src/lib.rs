//! # tb-config
//!
//! Layered configuration loading for TaskBuddy using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TASKBUDDY_*` prefix, `__` as separator)
//! 2. Project-level `.taskbuddy/config.toml`
//! 3. User-level `~/.config/taskbuddy/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TASKBUDDY_STORE__DB_PATH` -> `store.db_path`,
//! `TASKBUDDY_IDENTITY__DISPLAY_NAME` -> `identity.display_name`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tb_config::TaskBuddyConfig;
//!
//! let config = TaskBuddyConfig::load_with_dotenv().expect("config");
//! let db = config.db_path().expect("db path");
//! println!("database at {}", db.display());
//! ```

mod error;
mod general;
mod identity;
mod store;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use identity::IdentityConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every configuration key.
pub const ENV_PREFIX: &str = "TASKBUDDY_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskBuddyConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TaskBuddyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source is malformed, or
    /// `ConfigError::InvalidValue` if a field fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.identity.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".taskbuddy/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskbuddy").join("config.toml"))
    }

    /// Directory holding the database and the session file.
    ///
    /// `general.data_dir` wins; otherwise `~/.taskbuddy`.
    pub fn data_dir(&self) -> Option<PathBuf> {
        if !self.general.data_dir.is_empty() {
            return Some(PathBuf::from(&self.general.data_dir));
        }
        dirs::home_dir().map(|home| home.join(".taskbuddy"))
    }

    /// Resolved path of the task database.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnresolvedPath` when neither `store.db_path` nor
    /// a data directory is available.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        self.store.resolve_db_path(self.data_dir().as_ref())
    }

    /// Resolved path of the session file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnresolvedPath` when neither
    /// `identity.session_path` nor a data directory is available.
    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.identity.session_path.is_empty() {
            return Ok(PathBuf::from(&self.identity.session_path));
        }
        self.data_dir()
            .map(|dir| dir.join("session.json"))
            .ok_or_else(|| ConfigError::UnresolvedPath {
                field: "identity.session_path".into(),
                reason: "home directory not found".into(),
            })
    }
}
