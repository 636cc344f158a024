use chrono::Utc;
use pms_core::entities::TargetRecord;
use pms_core::snapshot::capture_snapshot;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SnapshotArgs;
use crate::commands::shared::input::read_json_file;
use crate::output::output;

/// Handle `pms snapshot`.
pub fn handle(args: &SnapshotArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let record: TargetRecord = read_json_file(&args.file)?;
    let snapshot = capture_snapshot(&record, Utc::now());
    tracing::debug!(
        target_type = %snapshot.target_type,
        target_id = %snapshot.target_id,
        fields = snapshot.fields.len(),
        "captured snapshot"
    );
    output(&snapshot, flags.format)
}
