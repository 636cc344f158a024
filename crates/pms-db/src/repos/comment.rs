//! Comment repository. Comments are allowed in every lifecycle state.

use chrono::Utc;

use pms_core::audit_detail::ChildDetail;
use pms_core::entities::Comment;
use pms_core::enums::{AuditAction, EntityType, TrailOp};
use pms_core::ids::PREFIX_COMMENT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, to_json_value};
use crate::service::{Mutation, PmsService};

impl PmsService {
    /// Append a comment to a change request.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` if the request does not exist or the
    /// user or message is blank.
    pub async fn add_comment(
        &self,
        change_request_id: &str,
        user_id: &str,
        message: &str,
    ) -> Result<Comment, DatabaseError> {
        let mut request = self.get_change_request(change_request_id).await?;
        let now = Utc::now();
        let comment = request.add_comment(user_id, message, now)?.clone();

        let comment_id = self.db().generate_id(PREFIX_COMMENT).await?;
        insert_comment_row(self.db().conn(), &comment_id, change_request_id, &comment).await?;
        self.touch(change_request_id, now).await?;

        self.record(Mutation {
            actor: user_id,
            vessel: &request.vessel_id,
            entity: EntityType::Comment,
            entity_id: &comment_id,
            action: AuditAction::Commented,
            op: TrailOp::Comment,
            detail: Some(to_json_value(&ChildDetail {
                change_request_id: change_request_id.to_string(),
            })?),
            data: serde_json::json!({
                "changeRequestId": change_request_id,
                "comment": to_json_value(&comment)?,
            }),
            at: now,
        })
        .await?;

        Ok(comment)
    }

    /// Comments on a change request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_comments(&self, change_request_id: &str) -> Result<Vec<Comment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT user_id, message, created_at FROM change_request_comments
                 WHERE change_request_id = ?1 ORDER BY created_at, rowid",
                [change_request_id],
            )
            .await?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(Comment {
                user_id: row.get(0)?,
                message: row.get(1)?,
                created_at: parse_datetime(&row.get::<String>(2)?)?,
            });
        }
        Ok(comments)
    }

    pub(crate) async fn touch(
        &self,
        change_request_id: &str,
        at: chrono::DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE change_requests SET updated_at = ?1 WHERE id = ?2",
                libsql::params![at.to_rfc3339(), change_request_id],
            )
            .await?;
        Ok(())
    }
}

/// Insert one comment row on `conn`, which may be an open transaction.
pub(crate) async fn insert_comment_row(
    conn: &libsql::Connection,
    comment_id: &str,
    change_request_id: &str,
    comment: &Comment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO change_request_comments (id, change_request_id, user_id, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            comment_id,
            change_request_id,
            comment.user_id.as_str(),
            comment.message.as_str(),
            comment.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pms_core::enums::ChangeRequestStatus;
    use pms_core::errors::CoreError;
    use pms_core::lifecycle::Review;

    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{draft, submitted, test_service};

    #[tokio::test]
    async fn comments_listed_in_order() {
        let svc = test_service().await;
        let request = draft(&svc, "Discuss").await;
        svc.add_comment(&request.id, "usr-chief", "first").await.unwrap();
        svc.add_comment(&request.id, "usr-2e", "second").await.unwrap();

        let comments = svc.list_comments(&request.id).await.unwrap();
        let messages: Vec<_> = comments.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn comments_allowed_after_approval() {
        let svc = test_service().await;
        let request = submitted(&svc).await;
        svc.approve_change_request(&request.id, &Review::new("usr-super", "ok"))
            .await
            .unwrap();
        svc.add_comment(&request.id, "usr-chief", "Applied on board")
            .await
            .unwrap();

        let fetched = svc.get_change_request(&request.id).await.unwrap();
        assert_eq!(fetched.status, ChangeRequestStatus::Approved);
        assert_eq!(fetched.comments.len(), 2);
    }

    #[tokio::test]
    async fn blank_comment_rejected() {
        let svc = test_service().await;
        let request = draft(&svc, "Discuss").await;
        let err = svc.add_comment(&request.id, "usr-chief", "  ").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Validation(_))));
        assert!(svc.list_comments(&request.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comment_is_audited_under_its_own_id() {
        let svc = test_service().await;
        let request = draft(&svc, "Discuss").await;
        svc.add_comment(&request.id, "usr-chief", "hello").await.unwrap();

        let audit = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Comment),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert!(audit[0].entity_id.starts_with("cmt-"));
        assert_eq!(audit[0].detail.as_ref().unwrap()["change_request_id"], request.id.as_str());
    }
}
