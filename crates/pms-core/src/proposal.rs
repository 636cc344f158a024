//! Proposed-change builder.
//!
//! Holds the per-field toggle and value state behind the "Modify PMS" form.
//! The diff itself is delegated to [`crate::diff::build_changes`].

use std::collections::HashMap;

use crate::diff::build_changes;
use crate::entities::{Change, MovePreview, Snapshot};
use crate::path::FieldPath;
use crate::value::FieldValue;

/// Interactive proposal state for one change request.
///
/// Toggles keep first-insertion order: switching a field off and on again
/// keeps its original position in the review list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalState {
    toggled: Vec<(FieldPath, bool)>,
    values: HashMap<FieldPath, FieldValue>,
    move_preview: Option<MovePreview>,
}

impl ProposalState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from a previously saved change list.
    ///
    /// Every change becomes a toggled field holding its `after` value, so an
    /// immediate [`review_changes`](Self::review_changes) against the same
    /// snapshot reproduces the list.
    #[must_use]
    pub fn from_changes(changes: &[Change], move_preview: Option<MovePreview>) -> Self {
        let mut state = Self {
            move_preview,
            ..Self::default()
        };
        for change in changes {
            state.toggle_field(change.path.clone(), true);
            state.set_field_value(change.path.clone(), change.after.clone());
        }
        state
    }

    /// Switch a field on or off. Switching off discards its entered value.
    pub fn toggle_field(&mut self, path: FieldPath, enabled: bool) {
        if !enabled {
            self.values.remove(&path);
        }
        match self.toggled.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = enabled,
            None => self.toggled.push((path, enabled)),
        }
    }

    /// Store a candidate value. Does not change the toggle state.
    pub fn set_field_value(&mut self, path: FieldPath, value: FieldValue) {
        self.values.insert(path, value);
    }

    #[must_use]
    pub fn is_toggled(&self, path: &FieldPath) -> bool {
        self.toggled.iter().any(|(p, on)| *on && p == path)
    }

    #[must_use]
    pub fn value(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.values.get(path)
    }

    /// Paths currently switched on, in toggle order.
    #[must_use]
    pub fn toggled_paths(&self) -> Vec<FieldPath> {
        self.toggled
            .iter()
            .filter(|(_, on)| *on)
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Whether "Review Changes" has anything to act on.
    #[must_use]
    pub fn has_toggled(&self) -> bool {
        self.toggled.iter().any(|(_, on)| *on)
    }

    /// Diff the current state against `snapshot`. Does not mutate state.
    #[must_use]
    pub fn review_changes(&self, snapshot: &Snapshot) -> Vec<Change> {
        build_changes(snapshot, &self.toggled_paths(), &self.values)
    }

    /// Reset all toggles and values and drop any move preview.
    pub fn clear_proposed(&mut self) {
        self.toggled.clear();
        self.values.clear();
        self.move_preview = None;
    }

    #[must_use]
    pub const fn move_preview(&self) -> Option<&MovePreview> {
        self.move_preview.as_ref()
    }

    /// Attach a move preview, replacing any previous one.
    pub fn set_move_preview(&mut self, preview: MovePreview) {
        self.move_preview = Some(preview);
    }

    /// Drop the move preview. Field toggles and values are untouched.
    pub fn clear_move(&mut self) -> Option<MovePreview> {
        self.move_preview.take()
    }
}
