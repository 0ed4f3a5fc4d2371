use tb_board::{FormOutcome, TaskForm};
use tb_core::responses::TaskCreateResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCreateArgs;
use crate::commands::shared::attachment;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &TaskCreateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx.session().await?;

    let attachment = match &args.attachment {
        Some(path) => Some(attachment::describe(path).await?),
        None => None,
    };
    let form = TaskForm {
        title: args.title.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
        due_date: args.due.clone(),
        status: args.status.clone(),
        attachment,
    };

    let FormOutcome::Dismiss { task_id } = form.submit(&session, ctx.service.as_ref()).await?;
    output(
        &TaskCreateResponse {
            task_id,
            dismissed: true,
        },
        flags.format,
    )
}
