use std::sync::Arc;

use anyhow::Context;
use tb_auth::{ProfileProvider, SessionContext};
use tb_config::TaskBuddyConfig;
use tb_db::{TaskRepository, TaskService};

use crate::bootstrap;

/// Shared resources for the task and board commands.
pub struct AppContext {
    pub config: TaskBuddyConfig,
    pub provider: ProfileProvider,
    pub service: Arc<TaskService>,
}

impl AppContext {
    /// Open the task database and the identity provider.
    pub async fn init(config: TaskBuddyConfig) -> anyhow::Result<Self> {
        let provider = bootstrap::identity_provider(&config)?;

        let db_path = config
            .db_path()
            .context("failed to resolve task database path")?;
        if !config.store.is_in_memory() {
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create data directory {}", parent.display())
                })?;
            }
        }

        let db_path_str = db_path.to_string_lossy();
        let service = TaskService::new_local(&db_path_str)
            .await
            .with_context(|| format!("failed to open task database at {db_path_str}"))?;
        tracing::debug!(path = %db_path_str, "task database opened");

        Ok(Self {
            config,
            provider,
            service: Arc::new(service),
        })
    }

    /// Session of the signed-in user.
    pub async fn session(&self) -> anyhow::Result<SessionContext> {
        Ok(tb_auth::resume_session(&self.provider).await?)
    }

    #[must_use]
    pub fn repository(&self) -> Arc<dyn TaskRepository> {
        Arc::clone(&self.service) as Arc<dyn TaskRepository>
    }

    /// End any live subscriptions still open on the service.
    pub fn shutdown(&self) {
        self.service.close_subscriptions();
    }
}
