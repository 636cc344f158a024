//! Error types for the change-request core.
//!
//! Guard violations and validation failures are explicit values so callers can
//! assert on the exact rejection. Storage and transport errors live in their
//! own crates and wrap `CoreError`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{ChangeRequestStatus, LifecycleAction};

/// Errors raised by core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A lifecycle operation was attempted from a state that does not allow it.
    #[error("Invalid state transition: change request {id} is {from}, cannot {action}")]
    InvalidTransition {
        id: String,
        from: ChangeRequestStatus,
        action: LifecycleAction,
    },

    /// One or more request fields failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A field path could not be parsed.
    #[error("Invalid field path '{0}'")]
    InvalidPath(String),

    /// A user-entered value does not fit the field's kind.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A relocation cannot be previewed.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Field errors carried by a validation failure, empty for any other variant.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => &errors.0,
            _ => &[],
        }
    }
}

/// Request field that a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestField {
    Title,
    Reason,
    TargetType,
    TargetId,
    ProposedChanges,
    RequestedByUserId,
    ReviewerId,
    Comment,
    Filename,
    Url,
}

impl RequestField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Reason => "reason",
            Self::TargetType => "targetType",
            Self::TargetId => "targetId",
            Self::ProposedChanges => "proposedChanges",
            Self::RequestedByUserId => "requestedByUserId",
            Self::ReviewerId => "reviewerId",
            Self::Comment => "comment",
            Self::Filename => "filename",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldProblem {
    Missing,
    TooLong { max: usize },
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: RequestField,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.problem {
            FieldProblem::Missing => write!(f, "{} is required", self.field),
            FieldProblem::TooLong { max } => {
                write!(f, "{} exceeds {max} characters", self.field)
            }
        }
    }
}

/// Ordered collection of field errors reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn missing(&mut self, field: RequestField) {
        self.0.push(FieldError {
            field,
            problem: FieldProblem::Missing,
        });
    }

    pub fn too_long(&mut self, field: RequestField, max: usize) {
        self.0.push(FieldError {
            field,
            problem: FieldProblem::TooLong { max },
        });
    }

    /// Record `field` as missing when `value` is absent or blank.
    pub fn require(&mut self, field: RequestField, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.missing(field);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: RequestField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Convert into `Err(CoreError::Validation)` when any error was recorded.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` carrying every recorded field error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_flags_blank_and_absent() {
        let mut errors = ValidationErrors::default();
        errors.require(RequestField::Title, Some("   "));
        errors.require(RequestField::Reason, None);
        errors.require(RequestField::Comment, Some("ok"));
        assert!(errors.contains(RequestField::Title));
        assert!(errors.contains(RequestField::Reason));
        assert!(!errors.contains(RequestField::Comment));
    }

    #[test]
    fn validation_message_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.missing(RequestField::Reason);
        errors.too_long(RequestField::Title, 120);
        let err = errors.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: reason is required; title exceeds 120 characters"
        );
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn guard_violation_names_state_and_action() {
        let err = CoreError::InvalidTransition {
            id: "cr-00000001".into(),
            from: ChangeRequestStatus::Approved,
            action: LifecycleAction::Update,
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition: change request cr-00000001 is approved, cannot update"
        );
    }
}
