use crate::cli::GlobalFlags;
use crate::commands::shared::board::OpenBoard;
use crate::context::AppContext;
use crate::output::output_board;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut board = OpenBoard::open(ctx).await?;
    let bucket = board.locate(id)?;
    board.controller.delete_task(id, bucket);
    output_board(&board.finish().await?, flags.format)
}
