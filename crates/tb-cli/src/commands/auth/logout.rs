use tb_auth::{AuthError, end_session, resume_session};
use tb_config::TaskBuddyConfig;
use tb_core::responses::AuthStatusResponse;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// End the current session. Signing out while signed out is not an error.
pub async fn handle(flags: &GlobalFlags, config: &TaskBuddyConfig) -> anyhow::Result<()> {
    let provider = bootstrap::identity_provider(config)?;
    let note = match resume_session(&provider).await {
        Ok(session) => {
            let identity = end_session(&provider, session).await?;
            tracing::debug!(user_id = %identity.user_id, "session closed");
            "signed out"
        }
        Err(AuthError::NotAuthenticated) => "not signed in",
        Err(error) => return Err(error.into()),
    };
    output(
        &AuthStatusResponse {
            authenticated: false,
            user: None,
            signed_in_at: None,
            note: Some(note.into()),
        },
        flags.format,
    )
}
