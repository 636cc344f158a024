//! Attachment repository. Only file references are stored; upload happens
//! elsewhere.

use chrono::Utc;

use pms_core::audit_detail::ChildDetail;
use pms_core::entities::Attachment;
use pms_core::enums::{AuditAction, EntityType, TrailOp};
use pms_core::ids::PREFIX_ATTACHMENT;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, to_json_value};
use crate::service::{Mutation, PmsService};

impl PmsService {
    /// Attach a file reference to a draft or returned request.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` if the request is
    /// not editable, or with a validation error for a blank filename or URL.
    pub async fn add_attachment(
        &self,
        change_request_id: &str,
        filename: &str,
        url: &str,
        actor: &str,
    ) -> Result<Attachment, DatabaseError> {
        let mut request = self.get_change_request(change_request_id).await?;
        let now = Utc::now();
        let attachment = request.add_attachment(filename, url, now)?.clone();

        let id = self.db().generate_id(PREFIX_ATTACHMENT).await?;
        self.db()
            .conn()
            .execute(
                "INSERT INTO change_request_attachments (id, change_request_id, filename, url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    change_request_id,
                    attachment.filename.as_str(),
                    attachment.url.as_str(),
                    attachment.created_at.to_rfc3339()
                ],
            )
            .await?;
        self.touch(change_request_id, now).await?;

        self.record(Mutation {
            actor,
            vessel: &request.vessel_id,
            entity: EntityType::Attachment,
            entity_id: &id,
            action: AuditAction::Attached,
            op: TrailOp::Attach,
            detail: Some(to_json_value(&ChildDetail {
                change_request_id: change_request_id.to_string(),
            })?),
            data: serde_json::json!({
                "changeRequestId": change_request_id,
                "attachment": to_json_value(&attachment)?,
            }),
            at: now,
        })
        .await?;

        Ok(attachment)
    }

    /// Attachments of a change request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_attachments(
        &self,
        change_request_id: &str,
    ) -> Result<Vec<Attachment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT filename, url, created_at FROM change_request_attachments
                 WHERE change_request_id = ?1 ORDER BY created_at, rowid",
                [change_request_id],
            )
            .await?;

        let mut attachments = Vec::new();
        while let Some(row) = rows.next().await? {
            attachments.push(Attachment {
                filename: row.get(0)?,
                url: row.get(1)?,
                created_at: parse_datetime(&row.get::<String>(2)?)?,
            });
        }
        Ok(attachments)
    }
}

#[cfg(test)]
mod tests {
    use pms_core::errors::CoreError;

    use super::*;
    use crate::test_support::helpers::{draft, submitted, test_service};

    #[tokio::test]
    async fn attach_to_draft() {
        let svc = test_service().await;
        let request = draft(&svc, "With photo").await;
        svc.add_attachment(&request.id, "plate.jpg", "https://files.example/plate.jpg", "usr-chief")
            .await
            .unwrap();

        let fetched = svc.get_change_request(&request.id).await.unwrap();
        assert_eq!(fetched.attachments.len(), 1);
        assert_eq!(fetched.attachments[0].filename, "plate.jpg");
    }

    #[tokio::test]
    async fn attach_refused_once_submitted() {
        let svc = test_service().await;
        let request = submitted(&svc).await;
        let err = svc
            .add_attachment(&request.id, "late.pdf", "https://files.example/late.pdf", "usr-chief")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::InvalidTransition { .. })));
        assert!(svc.list_attachments(&request.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attach_requires_url() {
        let svc = test_service().await;
        let request = draft(&svc, "With photo").await;
        let err = svc
            .add_attachment(&request.id, "plate.jpg", "", "usr-chief")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Validation(_))));
    }
}
