use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::path::FieldPath;
use crate::value::FieldValue;

/// One proposed field edit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Change {
    #[schemars(with = "String")]
    pub path: FieldPath,
    pub label: String,
    /// Snapshot value at the path's leaf key; `None` when the field is new.
    pub before: Option<FieldValue>,
    pub after: FieldValue,
}
