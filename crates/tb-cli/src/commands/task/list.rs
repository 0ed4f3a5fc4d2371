use tb_board::Board;
use tb_core::entities::Task;
use tb_core::enums::Bucket;
use tb_db::TaskRepository;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// List tasks in board order. Tasks whose status fits no bucket are not shown.
pub async fn run(bucket: Option<Bucket>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let board = Board::from_snapshot(ctx.service.list(session.owner_id()).await?);

    let tasks: Vec<&Task> = match bucket {
        Some(bucket) => board.bucket(bucket).iter().collect(),
        None => Bucket::ALL
            .into_iter()
            .flat_map(|bucket| board.bucket(bucket))
            .collect(),
    };
    output(&tasks, flags.format)
}
