//! Scoped session context.
//!
//! A [`SessionContext`] exists only between sign-in and sign-out. It is passed
//! explicitly to whatever needs the current user; there is no global session.

use tb_core::identity::UserIdentity;

/// The signed-in user's display identity for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    identity: UserIdentity,
}

impl SessionContext {
    /// Start a session for a freshly signed-in user.
    #[must_use]
    pub fn begin(identity: UserIdentity) -> Self {
        tracing::debug!(user_id = %identity.user_id, "session started");
        Self { identity }
    }

    #[must_use]
    pub const fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Owner key used for every repository call made in this session.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.identity.user_id
    }

    /// Replace the display identity (e.g. after a profile change).
    ///
    /// Returns the previous identity.
    pub fn replace(&mut self, identity: UserIdentity) -> UserIdentity {
        std::mem::replace(&mut self.identity, identity)
    }

    /// Tear the session down on sign-out.
    pub fn end(self) -> UserIdentity {
        tracing::debug!(user_id = %self.identity.user_id, "session ended");
        self.identity
    }
}
