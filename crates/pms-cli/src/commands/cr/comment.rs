use pms_core::responses::CommentResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, message: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let comment = ctx.service.add_comment(id, actor, message).await?;
    output(
        &CommentResponse {
            change_request_id: id.to_string(),
            comment,
        },
        flags.format,
    )
}
