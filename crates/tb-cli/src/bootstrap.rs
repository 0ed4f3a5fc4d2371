use anyhow::Context;
use tb_auth::{ProfileProvider, SessionStore};
use tb_config::TaskBuddyConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TaskBuddyConfig> {
    let mut config =
        TaskBuddyConfig::load_with_dotenv().context("failed to load taskbuddy configuration")?;

    if let Some(data_dir) = &flags.data_dir {
        config.general.data_dir = data_dir.to_string_lossy().into_owned();
    }

    Ok(config)
}

/// Identity provider backed by the configured session file.
pub fn identity_provider(config: &TaskBuddyConfig) -> anyhow::Result<ProfileProvider> {
    let session_path = config
        .session_path()
        .context("failed to resolve session file path")?;
    tracing::debug!(path = %session_path.display(), "using session file");
    Ok(ProfileProvider::new(SessionStore::new(session_path)))
}
