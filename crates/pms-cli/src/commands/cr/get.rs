use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, remote: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = if remote {
        ctx.client()?.get(id).await?
    } else {
        ctx.service.get_change_request(id).await?
    };
    output(&request, flags.format)
}
