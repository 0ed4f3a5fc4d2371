use tb_config::TaskBuddyConfig;
use tb_core::responses::AuthStatusResponse;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

pub async fn handle(flags: &GlobalFlags, config: &TaskBuddyConfig) -> anyhow::Result<()> {
    let provider = bootstrap::identity_provider(config)?;
    let status = match provider.session() {
        Some(stored) => AuthStatusResponse {
            authenticated: true,
            user: Some(stored.identity),
            signed_in_at: Some(stored.signed_in_at),
            note: None,
        },
        None => AuthStatusResponse {
            authenticated: false,
            user: None,
            signed_in_at: None,
            note: Some("not signed in, run `taskbuddy auth login`".into()),
        },
    };
    output(&status, flags.format)
}
