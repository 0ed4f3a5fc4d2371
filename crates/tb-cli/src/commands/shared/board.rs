use anyhow::Context;
use tb_auth::SessionContext;
use tb_board::{BoardController, BoardUpdate};
use tb_core::enums::Bucket;
use tb_core::responses::BoardResponse;

use crate::context::AppContext;

/// A board opened for the signed-in user, with its first snapshot applied.
pub struct OpenBoard {
    pub session: SessionContext,
    pub controller: BoardController,
}

impl OpenBoard {
    pub async fn open(ctx: &AppContext) -> anyhow::Result<Self> {
        let session = ctx.session().await?;
        let mut controller = BoardController::open(Some(&session), ctx.repository()).await?;
        controller
            .ready()
            .await
            .context("task board closed before the first snapshot")?;
        Ok(Self {
            session,
            controller,
        })
    }

    /// Bucket currently holding `task_id`.
    pub fn locate(&self, task_id: &str) -> anyhow::Result<Bucket> {
        self.controller
            .board()
            .locate(task_id)
            .with_context(|| format!("task '{task_id}' is not on the board"))
    }

    #[must_use]
    pub fn response(&self) -> BoardResponse {
        BoardResponse {
            owner: self.session.identity().clone(),
            revision: self.controller.revision(),
            columns: self.controller.board().columns(),
        }
    }

    /// Wait for dispatched writes, then release the subscription.
    ///
    /// Returns the board as the user sees it, or the first write failure.
    pub async fn finish(mut self) -> anyhow::Result<BoardResponse> {
        let outcomes = self.controller.settle_writes().await;
        let response = self.response();
        self.controller.close();

        for outcome in outcomes {
            if let BoardUpdate::WriteFailed { task_id, op, error } = outcome {
                return Err(anyhow::Error::from(error)
                    .context(format!("failed to {op} for task '{task_id}'")));
            }
        }
        Ok(response)
    }
}
