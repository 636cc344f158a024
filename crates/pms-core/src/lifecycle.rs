//! Change request lifecycle.
//!
//! ```text
//! draft → submitted → approved
//!                   → rejected
//!                   → returned → submitted
//! ```
//!
//! Every operation checks the state guard first, then validates its inputs,
//! and only then mutates. A refused operation leaves the request untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Attachment, Change, ChangeRequest, Comment, MovePreview, Snapshot};
use crate::enums::{Category, ChangeRequestStatus, LifecycleAction, TargetType};
use crate::errors::{CoreError, RequestField, ValidationErrors};

/// Longest title accepted, in characters.
pub const MAX_TITLE_LEN: usize = 120;

/// Input for creating a draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewChangeRequest {
    pub vessel_id: String,
    pub category: Category,
    pub title: String,
    pub reason: Option<String>,
    #[serde(rename = "snapshotBeforeJson")]
    pub target: Option<Snapshot>,
    #[serde(rename = "proposedChangesJson", default)]
    pub proposed_changes: Vec<Change>,
    #[serde(rename = "movePreviewJson")]
    pub move_preview: Option<MovePreview>,
}

impl NewChangeRequest {
    #[must_use]
    pub fn new(vessel_id: impl Into<String>, category: Category, title: impl Into<String>) -> Self {
        Self {
            vessel_id: vessel_id.into(),
            category,
            title: title.into(),
            reason: None,
            target: None,
            proposed_changes: Vec::new(),
            move_preview: None,
        }
    }
}

/// Partial update of a draft or returned request. Only `Some` fields apply.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Option<String>>,
    /// Replaces target type, target id and snapshot together.
    #[serde(rename = "snapshotBeforeJson", skip_serializing_if = "Option::is_none")]
    pub target: Option<Snapshot>,
    #[serde(rename = "proposedChangesJson", skip_serializing_if = "Option::is_none")]
    pub proposed_changes: Option<Vec<Change>>,
    /// `Some(None)` removes the move preview.
    #[serde(rename = "movePreviewJson", skip_serializing_if = "Option::is_none")]
    pub move_preview: Option<Option<MovePreview>>,
}

impl ChangeRequestPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.reason.is_none()
            && self.target.is_none()
            && self.proposed_changes.is_none()
            && self.move_preview.is_none()
    }
}

pub struct ChangeRequestPatchBuilder(ChangeRequestPatch);

impl ChangeRequestPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ChangeRequestPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: Option<String>) -> Self {
        self.0.reason = Some(reason);
        self
    }

    #[must_use]
    pub fn target(mut self, snapshot: Snapshot) -> Self {
        self.0.target = Some(snapshot);
        self
    }

    #[must_use]
    pub fn proposed_changes(mut self, changes: Vec<Change>) -> Self {
        self.0.proposed_changes = Some(changes);
        self
    }

    #[must_use]
    pub fn move_preview(mut self, preview: Option<MovePreview>) -> Self {
        self.0.move_preview = Some(preview);
        self
    }

    #[must_use]
    pub fn build(self) -> ChangeRequestPatch {
        self.0
    }
}

impl Default for ChangeRequestPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A reviewer's decision input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub reviewer_id: String,
    pub comment: String,
}

impl Review {
    #[must_use]
    pub fn new(reviewer_id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            reviewer_id: reviewer_id.into(),
            comment: comment.into(),
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::default();
        errors.require(RequestField::ReviewerId, Some(&self.reviewer_id));
        errors.require(RequestField::Comment, Some(&self.comment));
        errors.into_result()
    }
}

/// Finalized payload emitted on approval, for the apply step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedChange {
    pub request_id: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub changes: Vec<Change>,
    pub move_preview: Option<MovePreview>,
}

pub(crate) fn validate_title(errors: &mut ValidationErrors, title: &str) {
    if title.trim().is_empty() {
        errors.missing(RequestField::Title);
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.too_long(RequestField::Title, MAX_TITLE_LEN);
    }
}

impl ChangeRequest {
    /// Create a draft.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the title is blank or too long, or
    /// the requester is blank.
    pub fn create(
        id: impl Into<String>,
        new: NewChangeRequest,
        requested_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let mut errors = ValidationErrors::default();
        validate_title(&mut errors, &new.title);
        errors.require(RequestField::RequestedByUserId, Some(requested_by));
        errors.into_result()?;

        Ok(Self {
            id: id.into(),
            vessel_id: new.vessel_id,
            category: new.category,
            title: new.title,
            reason: new.reason,
            target_type: new.target.as_ref().map(|s| s.target_type),
            target_id: new.target.as_ref().map(|s| s.target_id.clone()),
            snapshot_before: new.target,
            proposed_changes: new.proposed_changes,
            move_preview: new.move_preview,
            status: ChangeRequestStatus::Draft,
            requested_by_user_id: requested_by.to_string(),
            submitted_at: None,
            reviewed_by_user_id: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            attachments: Vec::new(),
        })
    }

    /// Whether `action` is allowed from the current status.
    #[must_use]
    pub fn allows(&self, action: LifecycleAction) -> bool {
        match action.target_status() {
            Some(next) => self.status.can_transition_to(next),
            None if action == LifecycleAction::Delete => {
                self.status == ChangeRequestStatus::Draft
            }
            None => self.status.is_editable(),
        }
    }

    /// Fail with a guard violation unless `action` is allowed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` naming the current status and `action`.
    pub fn guard(&self, action: LifecycleAction) -> Result<(), CoreError> {
        if self.allows(action) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                action,
            })
        }
    }

    /// Apply a partial update while the request is editable.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is draft or
    /// returned, or `CoreError::Validation` for an invalid title.
    pub fn update(&mut self, patch: ChangeRequestPatch, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.guard(LifecycleAction::Update)?;
        if let Some(title) = &patch.title {
            let mut errors = ValidationErrors::default();
            validate_title(&mut errors, title);
            errors.into_result()?;
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(reason) = patch.reason {
            self.reason = reason;
        }
        if let Some(snapshot) = patch.target {
            self.target_type = Some(snapshot.target_type);
            self.target_id = Some(snapshot.target_id.clone());
            self.snapshot_before = Some(snapshot);
        }
        if let Some(changes) = patch.proposed_changes {
            self.proposed_changes = changes;
        }
        if let Some(preview) = patch.move_preview {
            self.move_preview = preview;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Fields that still block submission, in form order.
    #[must_use]
    pub fn missing_for_submit(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        validate_title(&mut errors, &self.title);
        errors.require(RequestField::Reason, self.reason.as_deref());
        if self.target_type.is_none() {
            errors.missing(RequestField::TargetType);
        }
        errors.require(RequestField::TargetId, self.target_id.as_deref());
        if self.proposed_changes.is_empty() {
            errors.missing(RequestField::ProposedChanges);
        }
        errors
    }

    /// Send the request for review.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is draft or
    /// returned, or `CoreError::Validation` listing every missing field.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.guard(LifecycleAction::Submit)?;
        self.missing_for_submit().into_result()?;

        self.status = ChangeRequestStatus::Submitted;
        self.submitted_at = Some(now);
        self.reviewed_by_user_id = None;
        self.reviewed_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Approve the request and emit the payload for the apply step.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is submitted,
    /// or `CoreError::Validation` if the review or target is incomplete.
    pub fn approve(&mut self, review: &Review, now: DateTime<Utc>) -> Result<ApprovedChange, CoreError> {
        self.guard(LifecycleAction::Approve)?;
        review.validate()?;
        let (Some(target_type), Some(target_id)) = (self.target_type, self.target_id.clone()) else {
            let mut errors = ValidationErrors::default();
            if self.target_type.is_none() {
                errors.missing(RequestField::TargetType);
            }
            errors.require(RequestField::TargetId, self.target_id.as_deref());
            return Err(CoreError::Validation(errors));
        };

        self.record_review(ChangeRequestStatus::Approved, review, now);
        Ok(ApprovedChange {
            request_id: self.id.clone(),
            target_type,
            target_id,
            changes: self.proposed_changes.clone(),
            move_preview: self.move_preview.clone(),
        })
    }

    /// Reject the request. Terminal.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is submitted,
    /// or `CoreError::Validation` if the review is incomplete.
    pub fn reject(&mut self, review: &Review, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.guard(LifecycleAction::Reject)?;
        review.validate()?;
        self.record_review(ChangeRequestStatus::Rejected, review, now);
        Ok(())
    }

    /// Send the request back to the requester for edits.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is submitted,
    /// or `CoreError::Validation` if the review is incomplete.
    pub fn return_for_revision(&mut self, review: &Review, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.guard(LifecycleAction::Return)?;
        review.validate()?;
        self.record_review(ChangeRequestStatus::Returned, review, now);
        Ok(())
    }

    /// Check that the request may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is a draft.
    pub fn ensure_deletable(&self) -> Result<(), CoreError> {
        self.guard(LifecycleAction::Delete)
    }

    /// Append a comment. Allowed in every state.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the user or message is blank.
    pub fn add_comment(
        &mut self,
        user_id: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<&Comment, CoreError> {
        let mut errors = ValidationErrors::default();
        errors.require(RequestField::RequestedByUserId, Some(user_id));
        errors.require(RequestField::Comment, Some(message));
        errors.into_result()?;

        self.comments.push(Comment {
            user_id: user_id.to_string(),
            message: message.to_string(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(&self.comments[self.comments.len() - 1])
    }

    /// Append an attachment reference while the request is editable.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` unless the request is draft or
    /// returned, or `CoreError::Validation` if filename or URL is blank.
    pub fn add_attachment(
        &mut self,
        filename: &str,
        url: &str,
        now: DateTime<Utc>,
    ) -> Result<&Attachment, CoreError> {
        self.guard(LifecycleAction::Attach)?;
        let mut errors = ValidationErrors::default();
        errors.require(RequestField::Filename, Some(filename));
        errors.require(RequestField::Url, Some(url));
        errors.into_result()?;

        self.attachments.push(Attachment {
            filename: filename.to_string(),
            url: url.to_string(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    fn record_review(&mut self, status: ChangeRequestStatus, review: &Review, now: DateTime<Utc>) {
        self.status = status;
        self.reviewed_by_user_id = Some(review.reviewer_id.clone());
        self.reviewed_at = Some(now);
        self.updated_at = now;
        self.comments.push(Comment {
            user_id: review.reviewer_id.clone(),
            message: review.comment.clone(),
            created_at: now,
        });
    }
}
