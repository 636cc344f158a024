//! Entity structs for the change-request workflow.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation. Wire-facing shapes use camelCase to match
//! the change-request API.

mod audit;
mod change;
mod change_request;
mod move_preview;
mod snapshot;
mod target;

pub use audit::AuditEntry;
pub use change::Change;
pub use change_request::{Attachment, ChangeRequest, ChangeRequestSummary, Comment};
pub use move_preview::MovePreview;
pub use snapshot::Snapshot;
pub use target::{
    ClassificationData, ComponentRecord, ConditionMonitoringMetrics, HierarchyNode, PATH_SEPARATOR,
    SpareRecord, StoreRecord, TargetRecord, WorkOrderRecord,
};
