use tb_board::BoardUpdate;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BoardArgs;
use crate::commands::shared::board::OpenBoard;
use crate::context::AppContext;
use crate::output::output_board;

enum Wake {
    Update(BoardUpdate),
    PollStopped,
    Interrupted,
}

/// Handle `taskbuddy board`.
///
/// With `--watch` (or `general.watch`), prints the board again on every
/// snapshot until Ctrl-C, then unsubscribes. Writes made by other
/// `taskbuddy` processes are picked up every `general.watch_interval_ms`.
pub async fn handle(args: &BoardArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut board = OpenBoard::open(ctx).await?;
    output_board(&board.response(), flags.format)?;

    if !(args.watch || ctx.config.general.watch) {
        board.controller.close();
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    let external = ctx
        .service
        .follow_external_writes(ctx.config.general.watch_interval());
    tokio::pin!(ctrl_c, external);
    loop {
        let wake = tokio::select! {
            _ = &mut ctrl_c => Wake::Interrupted,
            () = &mut external => Wake::PollStopped,
            update = board.controller.next_event() => Wake::Update(update),
        };
        match wake {
            Wake::Update(BoardUpdate::Snapshot { .. }) => {
                output_board(&board.response(), flags.format)?;
            }
            Wake::Update(BoardUpdate::SubscriptionClosed) => {
                tracing::warn!("task subscription closed, stopping watch");
                break;
            }
            Wake::Update(BoardUpdate::WriteSettled { .. } | BoardUpdate::WriteFailed { .. }) => {}
            Wake::PollStopped => {
                tracing::warn!("external write polling stopped, stopping watch");
                break;
            }
            Wake::Interrupted => {
                tracing::debug!("interrupted, closing board");
                break;
            }
        }
    }
    board.controller.close();
    Ok(())
}
