//! Session file persistence.
//!
//! The signed-in identity lives in `session.json`. A sibling `profiles.json`
//! remembers the user ID assigned to each display name so signing in again
//! keeps the same owner key. Both files are written 0600 (directory 0700) on
//! Unix.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::identity::UserIdentity;

use crate::error::AuthError;

const PROFILES_FILE_NAME: &str = "profiles.json";

/// Contents of the session file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    pub identity: UserIdentity,
    pub signed_in_at: DateTime<Utc>,
}

/// File-backed store for the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the file cannot be written.
    pub fn store(&self, session: &StoredSession) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| AuthError::SessionStore(format!("serialize session: {e}")))?;
        write_private(&self.path, &json)
    }

    /// Load the session. A missing, empty, or unreadable file means no session.
    #[must_use]
    pub fn load(&self) -> Option<StoredSession> {
        let content = fs::read_to_string(&self.path)
            .ok()
            .filter(|s| !s.trim().is_empty())?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "ignoring corrupt session file");
                None
            }
        }
    }

    /// Delete the session file. Deleting a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                AuthError::SessionStore(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    /// User ID previously assigned to `display_name`, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the profiles file exists but
    /// cannot be read or parsed.
    pub fn known_user_id(&self, display_name: &str) -> Result<Option<String>, AuthError> {
        Ok(self.load_profiles()?.remove(display_name))
    }

    /// Remember the user ID assigned to `display_name`.
    ///
    /// An unreadable profiles file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the profiles file cannot be read,
    /// parsed, or written.
    pub fn remember_user_id(&self, display_name: &str, user_id: &str) -> Result<(), AuthError> {
        let mut profiles = self.load_profiles()?;
        profiles.insert(display_name.to_string(), user_id.to_string());
        let json = serde_json::to_string_pretty(&profiles)
            .map_err(|e| AuthError::SessionStore(format!("serialize profiles: {e}")))?;
        write_private(&self.profiles_path(), &json)
    }

    fn profiles_path(&self) -> PathBuf {
        self.path
            .parent()
            .map_or_else(|| PathBuf::from(PROFILES_FILE_NAME), |dir| dir.join(PROFILES_FILE_NAME))
    }

    /// Known profiles. A missing or blank file means none yet.
    fn load_profiles(&self) -> Result<BTreeMap<String, String>, AuthError> {
        let path = self.profiles_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AuthError::SessionStore(format!("read {}: {e}", path.display())));
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|error| {
            tracing::warn!(
                %error,
                path = %path.display(),
                "corrupt profiles file, refusing to overwrite"
            );
            AuthError::SessionStore(format!(
                "corrupt profiles file {}: {error}; fix or remove it to sign in",
                path.display()
            ))
        })
    }
}

fn write_private(path: &Path, content: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::SessionStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, content)
        .map_err(|e| AuthError::SessionStore(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::SessionStore(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}
