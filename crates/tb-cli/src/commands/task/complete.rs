use tb_core::enums::Bucket;

use crate::cli::GlobalFlags;
use crate::commands::shared::board::OpenBoard;
use crate::context::AppContext;
use crate::output::output_board;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut board = OpenBoard::open(ctx).await?;
    let from = board.locate(id)?;
    if from == Bucket::Completed {
        tracing::info!(task_id = id, "task already completed");
    } else {
        board.controller.complete_task(id, from);
    }
    output_board(&board.finish().await?, flags.format)
}
