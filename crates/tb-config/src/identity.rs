//! Identity provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Profile used by the local identity provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Display name used when signing in without `--name`.
    #[serde(default)]
    pub display_name: String,

    /// Avatar URL used when signing in without `--photo-url`.
    #[serde(default)]
    pub photo_url: String,

    /// Path of the session file. Empty = `<data dir>/session.json`.
    #[serde(default)]
    pub session_path: String,
}

impl IdentityConfig {
    /// Check if a default profile is configured.
    pub fn is_configured(&self) -> bool {
        !self.display_name.trim().is_empty()
    }

    /// Avatar URL as an option (empty string = none).
    pub fn photo_url(&self) -> Option<String> {
        let url = self.photo_url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }

    /// Reject avatar URLs that are not http(s).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming `identity.photo_url`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.photo_url() {
            Some(url) if !(url.starts_with("https://") || url.starts_with("http://")) => {
                Err(ConfigError::InvalidValue {
                    field: "identity.photo_url".into(),
                    reason: format!("expected an http(s) URL, got '{url}'"),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = IdentityConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.photo_url(), None);
    }

    #[test]
    fn configured_when_name_set() {
        let config = IdentityConfig {
            display_name: "Ada".into(),
            photo_url: " https://example.com/a.png ".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.photo_url().as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn non_http_photo_url_is_rejected() {
        let config = IdentityConfig {
            photo_url: "file:///etc/passwd".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(IdentityConfig::default().validate().is_ok());
    }

    #[test]
    fn whitespace_name_is_not_configured() {
        let config = IdentityConfig {
            display_name: "   ".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
