use anyhow::Context;
use tb_auth::{Profile, ProfileProvider};
use tb_config::TaskBuddyConfig;
use tb_core::responses::AuthStatusResponse;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::output::output;
use crate::ui;

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &TaskBuddyConfig,
) -> anyhow::Result<()> {
    let provider = login_provider(args, config, bootstrap::identity_provider(config)?);
    let session = tb_auth::begin_session(&provider)
        .await
        .context("sign-in failed (pass --name when stdin is not a terminal)")?;

    let response = AuthStatusResponse {
        authenticated: true,
        user: Some(session.identity().clone()),
        signed_in_at: provider.session().map(|stored| stored.signed_in_at),
        note: None,
    };
    output(&response, flags.format)
}

/// Flags first, then the configured identity. Prompt only when neither names
/// the user.
fn login_provider(
    args: &AuthLoginArgs,
    config: &TaskBuddyConfig,
    provider: ProfileProvider,
) -> ProfileProvider {
    let name = args.name.clone().or_else(|| {
        config
            .identity
            .is_configured()
            .then(|| config.identity.display_name.clone())
    });
    match name {
        Some(name) => {
            let photo_url = args.photo_url.clone().or_else(|| config.identity.photo_url());
            provider.with_profile(Profile::new(name, photo_url))
        }
        None => provider.interactive(ui::prefs().interactive),
    }
}
