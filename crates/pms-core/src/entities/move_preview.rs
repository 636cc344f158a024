use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Non-committing relocation plan for a component.
///
/// Replaced wholesale when the destination changes; never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovePreview {
    pub old_path: String,
    pub new_path: String,
    pub old_code: String,
    /// `{parentCode}.{childCount + 1}`. The slot is not reserved.
    pub new_code_preview: String,
    pub new_parent_code: String,
}
