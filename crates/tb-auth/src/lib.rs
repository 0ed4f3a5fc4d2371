//! # tb-auth
//!
//! Authentication for TaskBuddy.
//!
//! Provides the scoped [`SessionContext`] handed to the board and the form,
//! the [`IdentityProvider`] seam, a local [`ProfileProvider`] that signs users
//! in from a display name, and the session file it persists to.

pub mod error;
pub mod provider;
pub mod session;
pub mod session_store;

pub use error::AuthError;
pub use provider::{IdentityProvider, Profile, ProfileProvider};
pub use session::SessionContext;
pub use session_store::{SessionStore, StoredSession};

use tb_core::identity::UserIdentity;

/// Sign in and open a session context in one step.
///
/// # Errors
///
/// Propagates the provider's `AuthError` (cancelled, rejected, store failure).
pub async fn begin_session<P>(provider: &P) -> Result<SessionContext, AuthError>
where
    P: IdentityProvider + ?Sized,
{
    let identity = provider.sign_in().await?;
    Ok(SessionContext::begin(identity))
}

/// Open a session context from an existing sign-in, if there is one.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when nobody is signed in.
pub async fn resume_session<P>(provider: &P) -> Result<SessionContext, AuthError>
where
    P: IdentityProvider + ?Sized,
{
    provider
        .current_user()
        .await?
        .map(SessionContext::begin)
        .ok_or(AuthError::NotAuthenticated)
}

/// Sign out and tear the session context down in one step.
///
/// Returns the identity that was signed in.
///
/// # Errors
///
/// Propagates the provider's `AuthError` if signing out fails.
pub async fn end_session<P>(
    provider: &P,
    session: SessionContext,
) -> Result<UserIdentity, AuthError>
where
    P: IdentityProvider + ?Sized,
{
    provider.sign_out().await?;
    Ok(session.end())
}
