//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! fix the shape of the common ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChangeRequestStatus;

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: ChangeRequestStatus,
    pub to: ChangeRequestStatus,
    /// Reviewer comment, when the transition was a review decision.
    pub comment: Option<String>,
}

/// Detail for `AuditAction::Updated`: names of the fields that were replaced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UpdatedDetail {
    pub fields: Vec<String>,
}

/// Detail for `AuditAction::Commented` and `AuditAction::Attached`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChildDetail {
    pub change_request_id: String,
}
