//! Draft editing session with optimistic save.
//!
//! The editor mutates a local copy immediately and persists in the
//! background. Each local edit bumps a revision counter; a save captures the
//! revision it was started at. When the save completes, the server's copy is
//! adopted only if nothing was edited in the meantime. Otherwise the local
//! edits win and only server-owned fields (status, timestamps, discussion)
//! are taken from the confirmed copy, so a stale response never overwrites
//! newer input.

use crate::entities::{Change, ChangeRequest, HierarchyNode, MovePreview, Snapshot};
use crate::enums::LifecycleAction;
use crate::errors::{CoreError, RequestField, ValidationErrors};
use crate::lifecycle::{ChangeRequestPatch, validate_title};
use crate::path::FieldPath;
use crate::proposal::ProposalState;
use crate::relocation::propose_move;
use crate::value::FieldValue;

/// An in-flight save, tagged with the revision it captured.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    revision: u64,
    /// Full local copy to persist.
    pub request: ChangeRequest,
}

impl SaveTicket {
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The editable fields as a patch, for an update call.
    #[must_use]
    pub fn patch(&self) -> ChangeRequestPatch {
        ChangeRequestPatch {
            title: Some(self.request.title.clone()),
            reason: Some(self.request.reason.clone()),
            target: self.request.snapshot_before.clone(),
            proposed_changes: Some(self.request.proposed_changes.clone()),
            move_preview: Some(self.request.move_preview.clone()),
        }
    }
}

/// What happened to a confirmed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No edits since the save started; the server copy was adopted.
    Adopted,
    /// Newer local edits exist; only server-owned fields were taken.
    KeptLocal,
    /// The ticket is older than the last confirmed save and was ignored.
    Stale,
}

/// Local editing state for one change request.
#[derive(Debug, Clone)]
pub struct DraftSession {
    request: ChangeRequest,
    proposal: ProposalState,
    revision: u64,
    confirmed_revision: u64,
    in_flight: Option<u64>,
}

impl DraftSession {
    #[must_use]
    pub fn new(request: ChangeRequest) -> Self {
        let proposal =
            ProposalState::from_changes(&request.proposed_changes, request.move_preview.clone());
        Self {
            request,
            proposal,
            revision: 0,
            confirmed_revision: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub const fn request(&self) -> &ChangeRequest {
        &self.request
    }

    #[must_use]
    pub const fn proposal(&self) -> &ProposalState {
        &self.proposal
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether local edits exist that no save has confirmed.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.revision != self.confirmed_revision
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn into_request(self) -> ChangeRequest {
        self.request
    }

    fn edit(&mut self) -> Result<(), CoreError> {
        self.request.guard(LifecycleAction::Update)?;
        self.revision += 1;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable,
    /// or `CoreError::Validation` for a blank or over-long title.
    pub fn set_title(&mut self, title: &str) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::default();
        validate_title(&mut errors, title);
        self.request.guard(LifecycleAction::Update)?;
        errors.into_result()?;
        self.edit()?;
        self.request.title = title.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn set_reason(&mut self, reason: Option<String>) -> Result<(), CoreError> {
        self.edit()?;
        self.request.reason = reason;
        Ok(())
    }

    /// Point the request at a new target. Any proposal built against the
    /// previous target is discarded.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn select_target(&mut self, snapshot: Snapshot) -> Result<(), CoreError> {
        self.edit()?;
        self.request.target_type = Some(snapshot.target_type);
        self.request.target_id = Some(snapshot.target_id.clone());
        self.request.snapshot_before = Some(snapshot);
        self.proposal.clear_proposed();
        self.request.proposed_changes.clear();
        self.request.move_preview = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn toggle_field(&mut self, path: FieldPath, enabled: bool) -> Result<(), CoreError> {
        self.edit()?;
        self.proposal.toggle_field(path, enabled);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn set_field_value(&mut self, path: FieldPath, value: FieldValue) -> Result<(), CoreError> {
        self.edit()?;
        self.proposal.set_field_value(path, value);
        Ok(())
    }

    /// Preview relocating the target under `parent` and keep the preview.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if no target is selected,
    /// `CoreError::InvalidMove` if the move is not possible, or
    /// `CoreError::InvalidTransition` if the request is not editable.
    pub fn propose_move(&mut self, parent: &HierarchyNode) -> Result<&MovePreview, CoreError> {
        self.request.guard(LifecycleAction::Update)?;
        let snapshot = self.request.snapshot_before.as_ref().ok_or_else(|| {
            let mut errors = ValidationErrors::default();
            errors.missing(RequestField::TargetId);
            CoreError::Validation(errors)
        })?;
        let preview = propose_move(snapshot, parent)?;
        self.edit()?;
        self.proposal.set_move_preview(preview);
        self.proposal
            .move_preview()
            .ok_or_else(|| CoreError::Other(anyhow::anyhow!("move preview was not stored")))
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn clear_move(&mut self) -> Result<Option<MovePreview>, CoreError> {
        self.edit()?;
        Ok(self.proposal.clear_move())
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn clear_proposed(&mut self) -> Result<(), CoreError> {
        self.edit()?;
        self.proposal.clear_proposed();
        Ok(())
    }

    /// Current diff against the captured snapshot. Empty without a target.
    #[must_use]
    pub fn review_changes(&self) -> Vec<Change> {
        self.request
            .snapshot_before
            .as_ref()
            .map(|snapshot| self.proposal.review_changes(snapshot))
            .unwrap_or_default()
    }

    /// Fold the proposal into the request and hand out a ticket to persist it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the request is not editable.
    pub fn begin_save(&mut self) -> Result<SaveTicket, CoreError> {
        self.request.guard(LifecycleAction::Update)?;
        self.request.proposed_changes = self.review_changes();
        self.request.move_preview = self.proposal.move_preview().cloned();
        self.in_flight = Some(self.revision);
        Ok(SaveTicket {
            revision: self.revision,
            request: self.request.clone(),
        })
    }

    /// Merge the server's confirmed copy for `ticket`.
    pub fn confirm_save(&mut self, ticket: &SaveTicket, confirmed: ChangeRequest) -> MergeOutcome {
        self.finish(ticket);
        if ticket.revision < self.confirmed_revision {
            return MergeOutcome::Stale;
        }
        if ticket.revision == self.revision {
            self.request = confirmed;
            self.confirmed_revision = ticket.revision;
            return MergeOutcome::Adopted;
        }

        self.confirmed_revision = ticket.revision;
        self.take_server_fields(confirmed);
        MergeOutcome::KeptLocal
    }

    /// Record a failed save. Local state is left as is.
    pub fn fail_save(&mut self, ticket: &SaveTicket) {
        self.finish(ticket);
    }

    /// Take a server-side status change (e.g. after submit) without touching
    /// local edits.
    pub fn refresh(&mut self, server: ChangeRequest) {
        self.take_server_fields(server);
    }

    fn finish(&mut self, ticket: &SaveTicket) {
        if self.in_flight == Some(ticket.revision) {
            self.in_flight = None;
        }
    }

    fn take_server_fields(&mut self, server: ChangeRequest) {
        self.request.id = server.id;
        self.request.status = server.status;
        self.request.requested_by_user_id = server.requested_by_user_id;
        self.request.submitted_at = server.submitted_at;
        self.request.reviewed_by_user_id = server.reviewed_by_user_id;
        self.request.reviewed_at = server.reviewed_at;
        self.request.created_at = server.created_at;
        self.request.updated_at = self.request.updated_at.max(server.updated_at);
        self.request.comments = server.comments;
        self.request.attachments = server.attachments;
    }
}
