//! JSONL trail operation envelope.
//!
//! Every local mutation is recorded as a `TrailOperation` in per-vessel
//! `.pms/trail/{vessel}.jsonl` files, giving an append-only history that
//! survives database loss.
//!
//! Old trail files without a `v` field deserialize with `v == 1`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
///
/// `data` holds the full entity for `Create`, the applied patch for
/// `Update`, and a status detail for `Transition`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 timestamp of the operation.
    pub ts: String,

    /// Vessel the change request belongs to. Selects the trail file.
    pub vessel: String,

    /// User who performed the operation.
    pub actor: String,

    pub op: TrailOp,

    pub entity: EntityType,

    pub id: String,

    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_op_roundtrip() {
        let op = TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".to_string(),
            vessel: "vsl-001".to_string(),
            actor: "usr-chief".to_string(),
            op: TrailOp::Create,
            entity: EntityType::ChangeRequest,
            id: "cr-deadbeef".to_string(),
            data: serde_json::json!({"title": "Correct maker"}),
        };

        let json = serde_json::to_string(&op).unwrap();
        let recovered: TrailOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, op);
    }

    #[test]
    fn trail_op_default_version() {
        let json = r#"{"ts":"2026-01-01T00:00:00Z","vessel":"vsl-1","actor":"usr-1","op":"comment","entity":"comment","id":"cmt-11111111","data":{}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 1);
        assert_eq!(op.op, TrailOp::Comment);
    }

    #[test]
    fn trail_op_explicit_version() {
        let json = r#"{"v":2,"ts":"2026-02-08T12:00:00Z","vessel":"vsl-1","actor":"usr-2","op":"transition","entity":"change_request","id":"cr-11111111","data":{"from":"submitted","to":"approved"}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 2);
        assert_eq!(op.op, TrailOp::Transition);
    }
}
