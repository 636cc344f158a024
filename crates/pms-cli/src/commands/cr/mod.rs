mod attach;
mod comment;
mod create;
mod delete;
mod get;
mod list;
mod propose;
mod push;
mod review;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CrCommands;
use crate::context::AppContext;

/// Handle `pms cr`.
pub async fn handle(
    action: &CrCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CrCommands::Create {
            title,
            category,
            reason,
            vessel,
            target,
        } => {
            create::run(
                title,
                category,
                reason.as_deref(),
                vessel.as_deref(),
                target.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        CrCommands::List {
            status,
            category,
            vessel,
            target_type,
            target_id,
            mine,
            search,
            limit,
            remote,
        } => {
            let args = list::ListArgs {
                status: status.as_deref(),
                category: category.as_deref(),
                vessel: vessel.as_deref(),
                target_type: target_type.as_deref(),
                target_id: target_id.as_deref(),
                mine: *mine,
                search: search.as_deref(),
                limit: *limit,
            };
            list::run(&args, *remote, ctx, flags).await
        }
        CrCommands::Get { id, remote } => get::run(id, *remote, ctx, flags).await,
        CrCommands::Update {
            id,
            title,
            reason,
            clear_reason,
        } => {
            update::run(
                id,
                title.as_deref(),
                reason.as_deref(),
                *clear_reason,
                ctx,
                flags,
            )
            .await
        }
        CrCommands::Propose(args) => propose::run(args, ctx, flags).await,
        CrCommands::Submit { id } => review::submit(id, ctx, flags).await,
        CrCommands::Approve {
            id,
            comment,
            remote,
        } => review::approve(id, comment, *remote, ctx, flags).await,
        CrCommands::Reject {
            id,
            comment,
            remote,
        } => review::reject(id, comment, *remote, ctx, flags).await,
        CrCommands::Return { id, comment } => review::return_for_revision(id, comment, ctx, flags).await,
        CrCommands::Delete { id, remote } => delete::run(id, *remote, ctx, flags).await,
        CrCommands::Comment { id, message } => comment::run(id, message, ctx, flags).await,
        CrCommands::Attach { id, filename, url } => {
            attach::run(id, filename, url, ctx, flags).await
        }
        CrCommands::Push { id, remote_id } => {
            push::run(id, remote_id.as_deref(), ctx, flags).await
        }
    }
}
