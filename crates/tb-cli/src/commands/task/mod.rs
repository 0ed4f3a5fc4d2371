mod complete;
mod create;
mod delete;
mod edit;
mod list;
mod move_task;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;

/// Handle `taskbuddy task <subcommand>`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create(args) => create::run(args, ctx, flags).await,
        TaskCommands::List { bucket } => list::run(*bucket, ctx, flags).await,
        TaskCommands::Move { id, to } => move_task::run(id, *to, ctx, flags).await,
        TaskCommands::Edit(args) => edit::run(args, ctx, flags).await,
        TaskCommands::Complete { id } => complete::run(id, ctx, flags).await,
        TaskCommands::Delete { id } => delete::run(id, ctx, flags).await,
    }
}
