use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;
use crate::value::FieldValue;

/// Point-in-time capture of a target record, used as the diff baseline.
///
/// Fields are keyed by leaf key (`certificateNo`, not
/// `classificationData.certificateNo`). Never mutated after capture.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub target_type: TargetType,
    pub target_id: String,
    pub display_key: String,
    pub display_name: String,
    pub display_path: String,
    pub captured_at: DateTime<Utc>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    /// Captured value for a leaf key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}
