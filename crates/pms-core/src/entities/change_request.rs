use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Change, MovePreview, Snapshot};
use crate::enums::{Category, ChangeRequestStatus, TargetType};

/// The unit of work routed through approval.
///
/// Owns its snapshot, change list and move preview outright; those are only
/// ever replaced as whole values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: String,
    pub vessel_id: String,
    pub category: Category,
    /// At most 120 characters.
    pub title: String,
    pub reason: Option<String>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    #[serde(rename = "snapshotBeforeJson")]
    pub snapshot_before: Option<Snapshot>,
    #[serde(rename = "proposedChangesJson", default)]
    pub proposed_changes: Vec<Change>,
    #[serde(rename = "movePreviewJson")]
    pub move_preview: Option<MovePreview>,
    pub status: ChangeRequestStatus,
    pub requested_by_user_id: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_by_user_id: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Discussion entry on a change request. Review decisions land here too.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Reference to a stored file. Storage itself is handled elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Condensed row for list views.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequestSummary {
    pub id: String,
    pub vessel_id: String,
    pub category: Category,
    pub title: String,
    pub status: ChangeRequestStatus,
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    pub requested_by_user_id: String,
    pub change_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl From<&ChangeRequest> for ChangeRequestSummary {
    fn from(request: &ChangeRequest) -> Self {
        Self {
            id: request.id.clone(),
            vessel_id: request.vessel_id.clone(),
            category: request.category,
            title: request.title.clone(),
            status: request.status,
            target_type: request.target_type,
            target_id: request.target_id.clone(),
            requested_by_user_id: request.requested_by_user_id.clone(),
            change_count: u32::try_from(request.proposed_changes.len()).unwrap_or(u32::MAX),
            updated_at: request.updated_at,
        }
    }
}
