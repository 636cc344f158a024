//! Response types returned as JSON by `pms` commands and the remote API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Attachment, ChangeRequest, ChangeRequestSummary, Comment};
use crate::lifecycle::ApprovedChange;

/// Response from listing change requests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequestListResponse {
    pub items: Vec<ChangeRequestSummary>,
    pub total: u32,
}

/// Response from approving a change request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub change_request: ChangeRequest,
    pub approved: ApprovedChange,
}

/// Response from adding a comment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub change_request_id: String,
    pub comment: Comment,
}

/// Response from adding an attachment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponse {
    pub change_request_id: String,
    pub attachment: Attachment,
}

/// Response from deleting a draft.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// Response from `pms cr push`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub local_id: String,
    pub remote_id: String,
    pub submitted: bool,
}
