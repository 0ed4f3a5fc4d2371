use tb_board::TaskEdit;
use tb_db::TaskRepository;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskEditArgs;
use crate::context::AppContext;
use crate::output::output;

/// Apply the given field changes, then print the stored task.
pub async fn run(args: &TaskEditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.session().await?;
    let edit = TaskEdit {
        title: args.title.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
        due_date: args.due.clone(),
    };
    edit.apply(&session, &args.id, ctx.service.as_ref()).await?;

    let task = ctx.service.get(session.owner_id(), &args.id).await?;
    output(&task, flags.format)
}
