use pms_core::lifecycle::ChangeRequestPatchBuilder;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    title: Option<&str>,
    reason: Option<&str>,
    clear_reason: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if title.is_none() && reason.is_none() && !clear_reason {
        anyhow::bail!("At least one of --title, --reason, or --clear-reason must be provided");
    }
    let actor = ctx.actor()?;

    let mut builder = ChangeRequestPatchBuilder::new();
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(reason) = reason {
        builder = builder.reason(Some(reason.to_string()));
    } else if clear_reason {
        builder = builder.reason(None);
    }

    let request = ctx
        .service
        .update_change_request(id, builder.build(), actor)
        .await?;
    output(&request, flags.format)
}
