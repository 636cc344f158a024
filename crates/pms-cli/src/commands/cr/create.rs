use chrono::Utc;
use pms_core::entities::TargetRecord;
use pms_core::enums::Category;
use pms_core::lifecycle::NewChangeRequest;
use pms_core::snapshot::capture_snapshot;

use crate::cli::GlobalFlags;
use crate::commands::shared::input::read_json_file;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    title: &str,
    category: &str,
    reason: Option<&str>,
    vessel: Option<&str>,
    target: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    let category = parse_enum::<Category>(category, "category")?;

    let mut new = NewChangeRequest::new(ctx.vessel(vessel)?, category, title);
    new.reason = reason.map(str::to_string);
    if let Some(path) = target {
        let record: TargetRecord = read_json_file(path)?;
        new.target = Some(capture_snapshot(&record, Utc::now()));
    }

    let request = ctx.service.create_change_request(new, actor).await?;
    output(&request, flags.format)
}
