//! # pms-db
//!
//! libSQL local store for PMS change requests.
//!
//! Holds change requests with their comments and attachments, plus an
//! append-only audit trail. Every mutation goes through the lifecycle rules
//! in `pms-core` before touching a row, and is mirrored to a per-vessel JSONL
//! trail file.
//!
//! Uses the `libsql` crate (C `SQLite` fork); tests run against `:memory:`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod trail;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct PmsDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PmsDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Per-connection in SQLite; comment/attachment cascades depend on it.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let pms_db = Self { db, conn };
        pms_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(pms_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"cr-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> PmsDb {
        PmsDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "change_requests",
            "change_request_comments",
            "change_request_attachments",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("cr").await.unwrap();
        assert!(id.starts_with("cr-"), "ID should start with 'cr-': {id}");
        assert_eq!(id.len(), 11, "ID should be 2 prefix + 1 dash + 8 hex: {id}");
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in pms_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn status_check_constraint_rejects_unknown_status() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO change_requests (id, vessel_id, category, title, status, requested_by_user_id)
                 VALUES ('cr-1', 'vsl-1', 'spares', 'x', 'pending', 'usr-1')",
                (),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn comments_cascade_on_delete() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO change_requests (id, vessel_id, category, title, requested_by_user_id)
                 VALUES ('cr-1', 'vsl-1', 'spares', 'x', 'usr-1')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO change_request_comments (id, change_request_id, user_id, message)
                 VALUES ('cmt-1', 'cr-1', 'usr-1', 'hello')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute("DELETE FROM change_requests WHERE id = 'cr-1'", ())
            .await
            .unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM change_request_comments", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }
}
