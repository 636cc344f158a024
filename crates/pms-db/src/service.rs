//! Service layer orchestrating database mutations with audit and trail.
//!
//! `PmsService` wraps `PmsDb` (raw database access) and `TrailWriter` (JSONL
//! persistence). All repo methods are implemented as `impl PmsService`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use pms_core::entities::AuditEntry;
use pms_core::enums::{AuditAction, EntityType, TrailOp};
use pms_core::ids::PREFIX_AUDIT;
use pms_core::trail::TrailOperation;

use crate::PmsDb;
use crate::error::DatabaseError;
use crate::trail::writer::TrailWriter;

/// Orchestrates database mutations with audit trail and JSONL trail.
///
/// Every mutation method follows this protocol:
/// 1. Load the current state and run the core lifecycle check
/// 2. Execute SQL
/// 3. Append audit entry
/// 4. Append JSONL trail operation
pub struct PmsService {
    db: PmsDb,
    trail: TrailWriter,
}

/// One recorded mutation: the audit entry and trail operation share it.
pub(crate) struct Mutation<'a> {
    pub actor: &'a str,
    pub vessel: &'a str,
    pub entity: EntityType,
    pub entity_id: &'a str,
    pub action: AuditAction,
    pub op: TrailOp,
    pub detail: Option<serde_json::Value>,
    pub data: serde_json::Value,
    pub at: DateTime<Utc>,
}

impl PmsService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. Pass `None` to disable
    ///   trail writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(db_path: &str, trail_dir: Option<PathBuf>) -> Result<Self, DatabaseError> {
        let db = PmsDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self { db, trail })
    }

    /// Create from an existing `PmsDb`.
    #[must_use]
    pub const fn from_db(db: PmsDb, trail: TrailWriter) -> Self {
        Self { db, trail }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &PmsDb {
        &self.db
    }

    /// Access the trail writer.
    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// Append the audit entry and trail operation for a mutation.
    pub(crate) async fn record(&self, m: Mutation<'_>) -> Result<(), DatabaseError> {
        let audit_id = self.db.generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: m.entity,
            entity_id: m.entity_id.to_string(),
            action: m.action,
            actor_id: m.actor.to_string(),
            detail: m.detail,
            created_at: m.at,
        })
        .await?;

        let op = TrailOperation {
            v: 1,
            ts: m.at.to_rfc3339(),
            vessel: m.vessel.to_string(),
            actor: m.actor.to_string(),
            op: m.op,
            entity: m.entity,
            id: m.entity_id.to_string(),
            data: m.data,
        };
        // The row is already committed; a lost trail line must not undo it.
        if let Err(error) = self.trail.append(&op) {
            tracing::warn!(id = m.entity_id, %error, "failed to append trail operation");
        }

        tracing::debug!(
            entity = %m.entity,
            id = m.entity_id,
            action = %m.action,
            actor = m.actor,
            "recorded mutation"
        );
        Ok(())
    }
}
