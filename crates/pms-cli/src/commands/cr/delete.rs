use pms_core::responses::DeleteResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, remote: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if remote {
        ctx.client()?.delete(id).await?;
    } else {
        let actor = ctx.actor()?;
        ctx.service.delete_change_request(id, actor).await?;
    }
    output(
        &DeleteResponse {
            id: id.to_string(),
            deleted: true,
        },
        flags.format,
    )
}
