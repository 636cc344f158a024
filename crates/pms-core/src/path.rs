//! Structured field paths.
//!
//! Every known target type nests at most one level (`classificationData.certificateNo`),
//! so a path is either a top-level key or a `group.key` pair. Anything deeper
//! or with empty segments is rejected at parse time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPath {
    Field(String),
    Nested { group: String, key: String },
}

impl FieldPath {
    #[must_use]
    pub fn field(key: impl Into<String>) -> Self {
        Self::Field(key.into())
    }

    #[must_use]
    pub fn nested(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Nested {
            group: group.into(),
            key: key.into(),
        }
    }

    /// The last segment, used as the key into a snapshot's flattened fields.
    #[must_use]
    pub fn leaf(&self) -> &str {
        match self {
            Self::Field(key) | Self::Nested { key, .. } => key,
        }
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Field(_) => None,
            Self::Nested { group, .. } => Some(group),
        }
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidPath(s.to_string());
        let mut parts = s.split('.');
        let first = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        match (parts.next(), parts.next()) {
            (None, _) => Ok(Self::field(first)),
            (Some(key), None) if !key.is_empty() => Ok(Self::nested(first, key)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for FieldPath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(key) => f.write_str(key),
            Self::Nested { group, key } => write!(f, "{group}.{key}"),
        }
    }
}
