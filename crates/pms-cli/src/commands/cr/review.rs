//! Submit and reviewer decisions.

use pms_core::lifecycle::Review;
use pms_core::responses::ApproveResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn submit(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let request = ctx.service.submit_change_request(id, actor).await?;
    output(&request, flags.format)
}

pub async fn approve(
    id: &str,
    comment: &str,
    remote: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let review = Review::new(ctx.actor()?, comment);
    let response = if remote {
        ctx.client()?.approve(id, &review).await?
    } else {
        let (change_request, approved) = ctx.service.approve_change_request(id, &review).await?;
        ApproveResponse {
            change_request,
            approved,
        }
    };
    tracing::debug!(
        id,
        target_id = %response.approved.target_id,
        changes = response.approved.changes.len(),
        "change request approved"
    );
    output(&response, flags.format)
}

pub async fn reject(
    id: &str,
    comment: &str,
    remote: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let review = Review::new(ctx.actor()?, comment);
    let request = if remote {
        ctx.client()?.reject(id, &review).await?
    } else {
        ctx.service.reject_change_request(id, &review).await?
    };
    output(&request, flags.format)
}

pub async fn return_for_revision(
    id: &str,
    comment: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let review = Review::new(ctx.actor()?, comment);
    let request = ctx.service.return_change_request(id, &review).await?;
    output(&request, flags.format)
}
