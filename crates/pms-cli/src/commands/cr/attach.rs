use pms_core::responses::AttachmentResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    filename: &str,
    url: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let attachment = ctx.service.add_attachment(id, filename, url, actor).await?;
    output(
        &AttachmentResponse {
            change_request_id: id.to_string(),
            attachment,
        },
        flags.format,
    )
}
