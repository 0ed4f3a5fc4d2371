//! Identity provider seam and the local profile provider.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use chrono::Utc;
use tb_core::identity::UserIdentity;
use tb_core::ids::{PREFIX_USER, format_id};

use crate::error::AuthError;
use crate::session_store::{SessionStore, StoredSession};

const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// Source of authenticated identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Interactive sign-in. May be cancelled or rejected; never retried.
    async fn sign_in(&self) -> Result<UserIdentity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The currently signed-in user, if any. Never cached.
    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError>;
}

/// Display profile offered at sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>, photo_url: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            photo_url,
        }
    }

    fn validate(self) -> Result<Self, AuthError> {
        let display_name = self.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AuthError::Rejected("display name is empty".into()));
        }
        if display_name.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(AuthError::Rejected(format!(
                "display name exceeds {MAX_DISPLAY_NAME_CHARS} characters"
            )));
        }
        if display_name.chars().any(char::is_control) {
            return Err(AuthError::Rejected(
                "display name contains control characters".into(),
            ));
        }
        let photo_url = self
            .photo_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &photo_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(AuthError::Rejected(format!("photo URL '{url}' is not http(s)")));
            }
        }
        Ok(Self {
            display_name,
            photo_url,
        })
    }
}

/// Local identity provider: signs in from a display name and keeps the
/// identity in a session file.
///
/// The profile comes from [`ProfileProvider::with_profile`] or, when
/// interactive, from a stdin prompt. An empty prompt answer cancels.
#[derive(Debug, Clone)]
pub struct ProfileProvider {
    store: SessionStore,
    profile: Option<Profile>,
    interactive: bool,
}

impl ProfileProvider {
    pub const fn new(store: SessionStore) -> Self {
        Self {
            store,
            profile: None,
            interactive: false,
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// The stored session, including when it started.
    #[must_use]
    pub fn session(&self) -> Option<StoredSession> {
        self.store.load()
    }

    async fn resolve_profile(&self) -> Result<Profile, AuthError> {
        if let Some(profile) = &self.profile {
            return profile.clone().validate();
        }
        if !self.interactive {
            return Err(AuthError::Cancelled);
        }
        let answer = tokio::task::spawn_blocking(prompt_profile)
            .await
            .map_err(|e| AuthError::SessionStore(format!("prompt task failed: {e}")))??;
        answer.ok_or(AuthError::Cancelled)?.validate()
    }

    fn user_id_for(&self, display_name: &str) -> Result<String, AuthError> {
        if let Some(user_id) = self.store.known_user_id(display_name)? {
            return Ok(user_id);
        }
        let user_id = generate_user_id()?;
        self.store.remember_user_id(display_name, &user_id)?;
        Ok(user_id)
    }
}

#[async_trait]
impl IdentityProvider for ProfileProvider {
    async fn sign_in(&self) -> Result<UserIdentity, AuthError> {
        let profile = self.resolve_profile().await?;
        let identity = UserIdentity {
            user_id: self.user_id_for(&profile.display_name)?,
            display_name: profile.display_name,
            photo_url: profile.photo_url,
        };
        self.store.store(&StoredSession {
            identity: identity.clone(),
            signed_in_at: Utc::now(),
        })?;
        tracing::info!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.delete()?;
        tracing::info!("signed out");
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError> {
        Ok(self.store.load().map(|session| session.identity))
    }
}

fn generate_user_id() -> Result<String, AuthError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| AuthError::SessionStore(format!("random id generation failed: {e}")))?;
    Ok(format_id(PREFIX_USER, bytes))
}

/// Ask for a profile on stderr/stdin. `Ok(None)` when the name is left empty.
fn prompt_profile() -> Result<Option<Profile>, AuthError> {
    let name = prompt_line("Display name: ")?;
    if name.is_empty() {
        return Ok(None);
    }
    let photo_url = prompt_line("Photo URL (optional): ")?;
    Ok(Some(Profile::new(
        name,
        (!photo_url.is_empty()).then_some(photo_url),
    )))
}

fn prompt_line(label: &str) -> Result<String, AuthError> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{label}")
        .and_then(|()| stderr.flush())
        .map_err(|e| AuthError::SessionStore(format!("prompt: {e}")))?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AuthError::SessionStore(format!("prompt: {e}")))?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_trims_and_drops_blank_photo() {
        let profile = Profile::new("  Ada  ", Some("   ".into())).validate().unwrap();
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(profile.photo_url, None);
    }

    #[test]
    fn profile_rejects_bad_input() {
        assert!(matches!(
            Profile::new("", None).validate(),
            Err(AuthError::Rejected(_))
        ));
        assert!(matches!(
            Profile::new("x".repeat(65), None).validate(),
            Err(AuthError::Rejected(_))
        ));
        assert!(matches!(
            Profile::new("Ada", Some("ftp://a".into())).validate(),
            Err(AuthError::Rejected(_))
        ));
    }

    #[test]
    fn generated_ids_have_user_prefix() {
        let id = generate_user_id().unwrap();
        assert!(id.starts_with("usr-"));
        assert_eq!(id.len(), 12);
    }
}
