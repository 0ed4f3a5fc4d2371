use tb_core::enums::Bucket;

use crate::cli::GlobalFlags;
use crate::commands::shared::board::OpenBoard;
use crate::context::AppContext;
use crate::output::output_board;

pub async fn run(id: &str, to: Bucket, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut board = OpenBoard::open(ctx).await?;
    let from = board.locate(id)?;
    if !board.controller.move_task(id, from, to) {
        tracing::info!(task_id = id, bucket = %to, "task already in bucket");
    }
    output_board(&board.finish().await?, flags.format)
}
