//! Send a locally drafted request to the configured server.

use pms_core::entities::ChangeRequest;
use pms_core::enums::ChangeRequestStatus;
use pms_core::lifecycle::{ChangeRequestPatch, ChangeRequestPatchBuilder, NewChangeRequest};
use pms_core::responses::PushResponse;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    remote_id: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let local = ctx.service.get_change_request(id).await?;
    if local.status.is_terminal() {
        anyhow::bail!(
            "change request {id} is {}; only open requests can be pushed",
            local.status
        );
    }

    let remote = match remote_id {
        Some(remote_id) => client.update(remote_id, &to_patch(&local)).await?,
        None => client.create(&to_new(&local)).await?,
    };

    let submitted = if local.status == ChangeRequestStatus::Submitted
        && remote.status != ChangeRequestStatus::Submitted
    {
        client
            .set_status(&remote.id, ChangeRequestStatus::Submitted, None)
            .await?
            .status
            == ChangeRequestStatus::Submitted
    } else {
        remote.status == ChangeRequestStatus::Submitted
    };

    tracing::debug!(local_id = id, remote_id = %remote.id, submitted, "pushed change request");
    output(
        &PushResponse {
            local_id: id.to_string(),
            remote_id: remote.id,
            submitted,
        },
        flags.format,
    )
}

fn to_new(local: &ChangeRequest) -> NewChangeRequest {
    let mut new = NewChangeRequest::new(local.vessel_id.clone(), local.category, local.title.clone());
    new.reason.clone_from(&local.reason);
    new.target.clone_from(&local.snapshot_before);
    new.proposed_changes.clone_from(&local.proposed_changes);
    new.move_preview.clone_from(&local.move_preview);
    new
}

fn to_patch(local: &ChangeRequest) -> ChangeRequestPatch {
    let mut builder = ChangeRequestPatchBuilder::new()
        .title(local.title.clone())
        .reason(local.reason.clone())
        .proposed_changes(local.proposed_changes.clone())
        .move_preview(local.move_preview.clone());
    if let Some(snapshot) = &local.snapshot_before {
        builder = builder.target(snapshot.clone());
    }
    builder.build()
}
