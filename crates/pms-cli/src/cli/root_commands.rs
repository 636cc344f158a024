use clap::{Args, Subcommand};

use crate::cli::subcommands::CrCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Change requests.
    Cr {
        #[command(subcommand)]
        action: CrCommands,
    },
    /// Capture a snapshot of a target record without creating a request.
    Snapshot(SnapshotArgs),
    /// List the editable fields of a target type.
    Fields(FieldsArgs),
    /// View audit trail.
    Audit(AuditArgs),
}

/// Arguments for `pms snapshot`.
#[derive(Clone, Debug, Args)]
pub struct SnapshotArgs {
    /// JSON file holding the target record (tagged with `targetType`).
    #[arg(long)]
    pub file: String,
}

/// Arguments for `pms fields`.
#[derive(Clone, Debug, Args)]
pub struct FieldsArgs {
    /// Target type: component, work_order, spare, store.
    pub target_type: String,
}

/// Arguments for `pms audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Entity id to show history for.
    #[arg(long)]
    pub id: Option<String>,
    /// Entity type: change_request, comment, attachment.
    #[arg(long)]
    pub entity_type: Option<String>,
    /// Action: created, updated, status_changed, commented, attached, deleted.
    #[arg(long)]
    pub action: Option<String>,
    /// Actor user id.
    #[arg(long)]
    pub actor: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}
