//! Change request repository: CRUD, filtered listing and lifecycle transitions.
//!
//! Every mutation loads the stored request, runs the matching lifecycle
//! operation from `pms-core` (guard first, then validation), and only then
//! writes the row back.

use chrono::{DateTime, Utc};

use pms_core::audit_detail::{StatusChangedDetail, UpdatedDetail};
use pms_core::entities::{ChangeRequest, ChangeRequestSummary};
use pms_core::enums::{
    AuditAction, Category, ChangeRequestStatus, EntityType, LifecycleAction, TargetType, TrailOp,
};
use pms_core::errors::CoreError;
use pms_core::ids::{PREFIX_CHANGE_REQUEST, PREFIX_COMMENT};
use pms_core::lifecycle::{ApprovedChange, ChangeRequestPatch, NewChangeRequest, Review};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, opt_text, parse_datetime, parse_enum, parse_json_column,
    parse_optional_datetime, to_json_text, to_json_value,
};
use crate::repos::comment::insert_comment_row;
use crate::service::{Mutation, PmsService};

const SELECT_COLS: &str = "id, vessel_id, category, title, reason, target_type, target_id, \
     snapshot_before_json, proposed_changes_json, move_preview_json, status, \
     requested_by_user_id, submitted_at, reviewed_by_user_id, reviewed_at, created_at, updated_at";

const UPDATE_SQL: &str = "UPDATE change_requests SET vessel_id = ?2, category = ?3, title = ?4, \
     reason = ?5, target_type = ?6, target_id = ?7, snapshot_before_json = ?8, \
     proposed_changes_json = ?9, move_preview_json = ?10, status = ?11, \
     requested_by_user_id = ?12, submitted_at = ?13, reviewed_by_user_id = ?14, \
     reviewed_at = ?15, created_at = ?16, updated_at = ?17 WHERE id = ?1";

fn row_to_change_request(row: &libsql::Row) -> Result<ChangeRequest, DatabaseError> {
    Ok(ChangeRequest {
        id: row.get(0)?,
        vessel_id: row.get(1)?,
        category: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        reason: get_opt_string(row, 4)?,
        target_type: get_opt_string(row, 5)?
            .as_deref()
            .map(parse_enum::<TargetType>)
            .transpose()?,
        target_id: get_opt_string(row, 6)?,
        snapshot_before: parse_json_column(get_opt_string(row, 7)?.as_deref())?,
        proposed_changes: parse_json_column(get_opt_string(row, 8)?.as_deref())?
            .unwrap_or_default(),
        move_preview: parse_json_column(get_opt_string(row, 9)?.as_deref())?,
        status: parse_enum(&row.get::<String>(10)?)?,
        requested_by_user_id: row.get(11)?,
        submitted_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        reviewed_by_user_id: get_opt_string(row, 13)?,
        reviewed_at: parse_optional_datetime(get_opt_string(row, 14)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(15)?)?,
        updated_at: parse_datetime(&row.get::<String>(16)?)?,
        comments: Vec::new(),
        attachments: Vec::new(),
    })
}

/// Column values in `SELECT_COLS` order.
fn row_values(request: &ChangeRequest) -> Result<Vec<libsql::Value>, DatabaseError> {
    use libsql::Value::Text;

    let snapshot = request.snapshot_before.as_ref().map(to_json_text).transpose()?;
    let preview = request.move_preview.as_ref().map(to_json_text).transpose()?;
    let submitted_at = request.submitted_at.map(|t| t.to_rfc3339());
    let reviewed_at = request.reviewed_at.map(|t| t.to_rfc3339());

    Ok(vec![
        Text(request.id.clone()),
        Text(request.vessel_id.clone()),
        Text(request.category.as_str().to_string()),
        Text(request.title.clone()),
        opt_text(request.reason.as_deref()),
        opt_text(request.target_type.map(TargetType::as_str)),
        opt_text(request.target_id.as_deref()),
        opt_text(snapshot.as_deref()),
        Text(to_json_text(&request.proposed_changes)?),
        opt_text(preview.as_deref()),
        Text(request.status.as_str().to_string()),
        Text(request.requested_by_user_id.clone()),
        opt_text(submitted_at.as_deref()),
        opt_text(request.reviewed_by_user_id.as_deref()),
        opt_text(reviewed_at.as_deref()),
        Text(request.created_at.to_rfc3339()),
        Text(request.updated_at.to_rfc3339()),
    ])
}

async fn write_row(conn: &libsql::Connection, request: &ChangeRequest) -> Result<(), DatabaseError> {
    let affected = conn
        .execute(UPDATE_SQL, libsql::params_from_iter(row_values(request)?))
        .await?;
    if affected == 0 {
        return Err(CoreError::NotFound {
            entity_type: EntityType::ChangeRequest.as_str().to_string(),
            id: request.id.clone(),
        }
        .into());
    }
    Ok(())
}

/// Escape `LIKE` wildcards so `q` matches literally.
fn escape_like(q: &str) -> String {
    let mut out = String::with_capacity(q.len());
    for ch in q.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Names of the fields a patch sets, in wire form.
fn patched_fields(patch: &ChangeRequestPatch) -> Result<Vec<String>, DatabaseError> {
    Ok(match to_json_value(patch)? {
        serde_json::Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    })
}

/// Filters for listing change requests.
#[derive(Debug, Clone, Default)]
pub struct ChangeRequestFilter {
    pub vessel_id: Option<String>,
    pub category: Option<Category>,
    pub status: Option<ChangeRequestStatus>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    pub requested_by: Option<String>,
    /// Case-insensitive substring match on title or reason.
    pub q: Option<String>,
    pub limit: Option<u32>,
}

impl PmsService {
    /// Create a draft change request.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with a validation error for a blank or
    /// over-long title, or `DatabaseError` if the INSERT fails.
    pub async fn create_change_request(
        &self,
        new: NewChangeRequest,
        actor: &str,
    ) -> Result<ChangeRequest, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CHANGE_REQUEST).await?;
        let request = ChangeRequest::create(id, new, actor, now)?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO change_requests ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
                ),
                libsql::params_from_iter(row_values(&request)?),
            )
            .await?;

        self.record(Mutation {
            actor,
            vessel: &request.vessel_id,
            entity: EntityType::ChangeRequest,
            entity_id: &request.id,
            action: AuditAction::Created,
            op: TrailOp::Create,
            detail: None,
            data: to_json_value(&request)?,
            at: now,
        })
        .await?;

        tracing::info!(id = %request.id, vessel = %request.vessel_id, "created change request");
        Ok(request)
    }

    /// Load a change request with its comments and attachments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core(CoreError::NotFound)` if no request has this ID.
    pub async fn get_change_request(&self, id: &str) -> Result<ChangeRequest, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM change_requests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| CoreError::NotFound {
            entity_type: EntityType::ChangeRequest.as_str().to_string(),
            id: id.to_string(),
        })?;
        let mut request = row_to_change_request(&row)?;
        request.comments = self.list_comments(id).await?;
        request.attachments = self.list_attachments(id).await?;
        Ok(request)
    }

    /// List change requests matching `filter`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_change_requests(
        &self,
        filter: &ChangeRequestFilter,
    ) -> Result<Vec<ChangeRequestSummary>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref vessel) = filter.vessel_id {
            params.push(libsql::Value::Text(vessel.clone()));
            conditions.push(format!("vessel_id = ?{}", params.len()));
        }
        if let Some(category) = filter.category {
            params.push(libsql::Value::Text(category.as_str().to_string()));
            conditions.push(format!("category = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(target_type) = filter.target_type {
            params.push(libsql::Value::Text(target_type.as_str().to_string()));
            conditions.push(format!("target_type = ?{}", params.len()));
        }
        if let Some(ref target_id) = filter.target_id {
            params.push(libsql::Value::Text(target_id.clone()));
            conditions.push(format!("target_id = ?{}", params.len()));
        }
        if let Some(ref requester) = filter.requested_by {
            params.push(libsql::Value::Text(requester.clone()));
            conditions.push(format!("requested_by_user_id = ?{}", params.len()));
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            params.push(libsql::Value::Text(format!("%{}%", escape_like(&q.to_lowercase()))));
            let idx = params.len();
            conditions.push(format!(
                "(lower(title) LIKE ?{idx} ESCAPE '\\' \
                 OR lower(coalesce(reason, '')) LIKE ?{idx} ESCAPE '\\')"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM change_requests {where_clause}
             ORDER BY updated_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next().await? {
            summaries.push(ChangeRequestSummary::from(&row_to_change_request(&row)?));
        }
        Ok(summaries)
    }

    /// Apply a partial update to a draft or returned request.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` if the request is
    /// not editable, or with a validation error for an invalid title.
    pub async fn update_change_request(
        &self,
        id: &str,
        patch: ChangeRequestPatch,
        actor: &str,
    ) -> Result<ChangeRequest, DatabaseError> {
        let mut request = self.get_change_request(id).await?;
        request.guard(LifecycleAction::Update)?;
        if patch.is_empty() {
            return Ok(request);
        }

        let fields = patched_fields(&patch)?;
        let data = to_json_value(&patch)?;
        let now = Utc::now();
        request.update(patch, now)?;
        write_row(self.db().conn(), &request).await?;

        self.record(Mutation {
            actor,
            vessel: &request.vessel_id,
            entity: EntityType::ChangeRequest,
            entity_id: id,
            action: AuditAction::Updated,
            op: TrailOp::Update,
            detail: Some(to_json_value(&UpdatedDetail { fields })?),
            data,
            at: now,
        })
        .await?;

        Ok(request)
    }

    /// Submit a draft or returned request for review.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` from a state that
    /// cannot submit, or with a validation error listing missing fields.
    pub async fn submit_change_request(
        &self,
        id: &str,
        actor: &str,
    ) -> Result<ChangeRequest, DatabaseError> {
        let (request, ()) = self
            .transition(id, actor, |request, now| request.submit(now))
            .await?;
        Ok(request)
    }

    /// Approve a submitted request, returning it with the payload for the
    /// apply step.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` unless the
    /// request is submitted, or with a validation error for an incomplete review.
    pub async fn approve_change_request(
        &self,
        id: &str,
        review: &Review,
    ) -> Result<(ChangeRequest, ApprovedChange), DatabaseError> {
        self.transition(id, &review.reviewer_id, |request, now| {
            request.approve(review, now)
        })
        .await
    }

    /// Reject a submitted request.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` unless the
    /// request is submitted, or with a validation error for an incomplete review.
    pub async fn reject_change_request(
        &self,
        id: &str,
        review: &Review,
    ) -> Result<ChangeRequest, DatabaseError> {
        let (request, ()) = self
            .transition(id, &review.reviewer_id, |request, now| {
                request.reject(review, now)
            })
            .await?;
        Ok(request)
    }

    /// Return a submitted request to its requester for revision.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` unless the
    /// request is submitted, or with a validation error for an incomplete review.
    pub async fn return_change_request(
        &self,
        id: &str,
        review: &Review,
    ) -> Result<ChangeRequest, DatabaseError> {
        let (request, ()) = self
            .transition(id, &review.reviewer_id, |request, now| {
                request.return_for_revision(review, now)
            })
            .await?;
        Ok(request)
    }

    /// Delete a draft. Comments and attachments go with it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` with `InvalidTransition` unless the
    /// request is a draft.
    pub async fn delete_change_request(&self, id: &str, actor: &str) -> Result<(), DatabaseError> {
        let request = self.get_change_request(id).await?;
        request.ensure_deletable()?;

        let now = Utc::now();
        self.db()
            .conn()
            .execute("DELETE FROM change_requests WHERE id = ?1", [id])
            .await?;

        self.record(Mutation {
            actor,
            vessel: &request.vessel_id,
            entity: EntityType::ChangeRequest,
            entity_id: id,
            action: AuditAction::Deleted,
            op: TrailOp::Delete,
            detail: None,
            data: serde_json::Value::Null,
            at: now,
        })
        .await?;

        tracing::info!(id, "deleted draft change request");
        Ok(())
    }

    /// Run a status-changing lifecycle operation and persist the result.
    ///
    /// Comments appended by the operation (review decisions) are stored as
    /// comment rows in the same transaction as the status change.
    async fn transition<T>(
        &self,
        id: &str,
        actor: &str,
        apply: impl FnOnce(&mut ChangeRequest, DateTime<Utc>) -> Result<T, CoreError>,
    ) -> Result<(ChangeRequest, T), DatabaseError> {
        let mut request = self.get_change_request(id).await?;
        let from = request.status;
        let known_comments = request.comments.len();

        let now = Utc::now();
        let output = apply(&mut request, now)?;

        let mut comment_ids = Vec::new();
        for _ in known_comments..request.comments.len() {
            comment_ids.push(self.db().generate_id(PREFIX_COMMENT).await?);
        }
        let tx = self.db().conn().transaction().await?;
        let written = async {
            write_row(&tx, &request).await?;
            let appended = &request.comments[known_comments..];
            for (comment_id, comment) in comment_ids.iter().zip(appended) {
                insert_comment_row(&tx, comment_id, id, comment).await?;
            }
            Ok::<(), DatabaseError>(())
        }
        .await;
        match written {
            Ok(()) => tx.commit().await?,
            Err(error) => {
                tx.rollback().await?;
                return Err(error);
            }
        }

        let detail = StatusChangedDetail {
            from,
            to: request.status,
            comment: request.comments[known_comments..]
                .last()
                .map(|c| c.message.clone()),
        };
        let detail = to_json_value(&detail)?;
        self.record(Mutation {
            actor,
            vessel: &request.vessel_id,
            entity: EntityType::ChangeRequest,
            entity_id: id,
            action: AuditAction::StatusChanged,
            op: TrailOp::Transition,
            detail: Some(detail.clone()),
            data: detail,
            at: now,
        })
        .await?;

        tracing::info!(id, from = %from, to = %request.status, actor, "change request transitioned");
        Ok((request, output))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        complete_patch, draft, submitted, test_service, test_service_with_trail,
    };
    use pms_core::errors::RequestField;
    use pms_core::lifecycle::ChangeRequestPatchBuilder;

    #[tokio::test]
    async fn create_change_request_roundtrip() {
        let svc = test_service().await;
        let created = draft(&svc, "Correct engine maker").await;

        assert!(created.id.starts_with("cr-"));
        assert_eq!(created.status, ChangeRequestStatus::Draft);

        let fetched = svc.get_change_request(&created.id).await.unwrap();
        assert_eq!(fetched.title, "Correct engine maker");
        assert_eq!(fetched.requested_by_user_id, "usr-chief");
        assert!(fetched.snapshot_before.is_none());
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let svc = test_service().await;
        let new = NewChangeRequest::new("vsl-001", Category::Components, "");
        let err = svc.create_change_request(new, "usr-chief").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Validation(_))));

        let all = svc.list_change_requests(&ChangeRequestFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_change_request("cr-00000000").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_stores_json_columns() {
        let svc = test_service().await;
        let created = draft(&svc, "Correct engine maker").await;
        let updated = svc
            .update_change_request(&created.id, complete_patch(), "usr-chief")
            .await
            .unwrap();

        let fetched = svc.get_change_request(&created.id).await.unwrap();
        assert_eq!(fetched.snapshot_before, updated.snapshot_before);
        assert_eq!(fetched.proposed_changes, updated.proposed_changes);
        assert_eq!(fetched.target_type, Some(TargetType::Component));
        assert_eq!(fetched.proposed_changes[0].label, "Maker");
    }

    #[tokio::test]
    async fn update_audits_patched_fields() {
        let svc = test_service().await;
        let created = draft(&svc, "Original").await;
        let patch = ChangeRequestPatchBuilder::new().title("Renamed").build();
        svc.update_change_request(&created.id, patch, "usr-chief")
            .await
            .unwrap();

        let audit = svc
            .query_audit(&AuditFilter {
                entity_id: Some(created.id.clone()),
                action: Some(AuditAction::Updated),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].detail, Some(serde_json::json!({"fields": ["title"]})));
    }

    #[tokio::test]
    async fn submit_incomplete_draft_names_missing_fields() {
        let svc = test_service().await;
        let created = draft(&svc, "Title only").await;

        let err = svc
            .submit_change_request(&created.id, "usr-chief")
            .await
            .unwrap_err();
        let DatabaseError::Core(core) = err else {
            panic!("expected core error, got {err:?}");
        };
        let fields: Vec<_> = core.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                RequestField::Reason,
                RequestField::TargetType,
                RequestField::TargetId,
                RequestField::ProposedChanges,
            ]
        );

        let fetched = svc.get_change_request(&created.id).await.unwrap();
        assert_eq!(fetched.status, ChangeRequestStatus::Draft);
        assert!(fetched.submitted_at.is_none());
    }

    #[tokio::test]
    async fn approve_persists_review_and_comment() {
        let svc = test_service().await;
        let request = submitted(&svc).await;

        let review = Review::new("usr-super", "Matches class records");
        let (approved, payload) = svc.approve_change_request(&request.id, &review).await.unwrap();
        assert_eq!(approved.status, ChangeRequestStatus::Approved);
        assert_eq!(payload.target_id, "cmp-001");
        assert_eq!(payload.changes.len(), 1);

        let fetched = svc.get_change_request(&request.id).await.unwrap();
        assert_eq!(fetched.status, ChangeRequestStatus::Approved);
        assert_eq!(fetched.reviewed_by_user_id.as_deref(), Some("usr-super"));
        assert!(fetched.reviewed_at.is_some());
        assert_eq!(fetched.comments.len(), 1);
        assert_eq!(fetched.comments[0].message, "Matches class records");
    }

    #[tokio::test]
    async fn approve_draft_is_refused_and_unchanged() {
        let svc = test_service().await;
        let created = draft(&svc, "Not yet submitted").await;

        let err = svc
            .approve_change_request(&created.id, &Review::new("usr-super", "ok"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::InvalidTransition {
                from: ChangeRequestStatus::Draft,
                action: LifecycleAction::Approve,
                ..
            })
        ));

        let fetched = svc.get_change_request(&created.id).await.unwrap();
        assert_eq!(fetched.status, ChangeRequestStatus::Draft);
        assert!(fetched.reviewed_at.is_none());
        assert!(fetched.reviewed_by_user_id.is_none());
        assert!(fetched.comments.is_empty());
    }

    #[tokio::test]
    async fn failed_review_comment_leaves_request_submitted() {
        let svc = test_service().await;
        let request = submitted(&svc).await;
        svc.db()
            .conn()
            .execute(
                "CREATE TRIGGER block_comments BEFORE INSERT ON change_request_comments
                 BEGIN SELECT RAISE(ABORT, 'comments unavailable'); END",
                (),
            )
            .await
            .unwrap();

        let err = svc
            .approve_change_request(&request.id, &Review::new("usr-super", "Looks right"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::LibSql(_)));

        let fetched = svc.get_change_request(&request.id).await.unwrap();
        assert_eq!(fetched.status, ChangeRequestStatus::Submitted);
        assert!(fetched.reviewed_by_user_id.is_none());
        assert!(fetched.comments.is_empty());
    }

    #[tokio::test]
    async fn return_then_resubmit() {
        let svc = test_service().await;
        let request = submitted(&svc).await;
        let review = Review::new("usr-super", "Attach the maker plate photo");

        let returned = svc.return_change_request(&request.id, &review).await.unwrap();
        assert_eq!(returned.status, ChangeRequestStatus::Returned);

        let patch = ChangeRequestPatchBuilder::new().title("Correct maker, photo attached").build();
        svc.update_change_request(&request.id, patch, "usr-chief")
            .await
            .unwrap();
        let resubmitted = svc
            .submit_change_request(&request.id, "usr-chief")
            .await
            .unwrap();
        assert_eq!(resubmitted.status, ChangeRequestStatus::Submitted);
        assert!(resubmitted.reviewed_at.is_none());

        let history = svc
            .query_audit(&AuditFilter {
                entity_id: Some(request.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn rejected_request_cannot_be_updated() {
        let svc = test_service().await;
        let request = submitted(&svc).await;
        svc.reject_change_request(&request.id, &Review::new("usr-super", "Duplicate"))
            .await
            .unwrap();

        let err = svc
            .update_change_request(&request.id, ChangeRequestPatch::default(), "usr-chief")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::InvalidTransition {
                from: ChangeRequestStatus::Rejected,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn delete_only_drafts() {
        let svc = test_service().await;
        let created = draft(&svc, "Scratch").await;
        svc.add_comment(&created.id, "usr-chief", "note to self")
            .await
            .unwrap();
        svc.delete_change_request(&created.id, "usr-chief")
            .await
            .unwrap();
        assert!(
            svc.get_change_request(&created.id)
                .await
                .unwrap_err()
                .is_not_found()
        );

        let request = submitted(&svc).await;
        let err = svc
            .delete_change_request(&request.id, "usr-chief")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_query() {
        let svc = test_service().await;
        draft(&svc, "Raise min stock for filters").await;
        draft(&svc, "Fix running hours").await;
        let sent = submitted(&svc).await;

        let submitted_only = svc
            .list_change_requests(&ChangeRequestFilter {
                status: Some(ChangeRequestStatus::Submitted),
                ..ChangeRequestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(submitted_only.len(), 1);
        assert_eq!(submitted_only[0].id, sent.id);
        assert_eq!(submitted_only[0].change_count, 1);

        let matching = svc
            .list_change_requests(&ChangeRequestFilter {
                q: Some("MIN STOCK".into()),
                ..ChangeRequestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].title, "Raise min stock for filters");

        let by_reason = svc
            .list_change_requests(&ChangeRequestFilter {
                q: Some("dry dock".into()),
                ..ChangeRequestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_reason.len(), 1);

        let limited = svc
            .list_change_requests(&ChangeRequestFilter {
                vessel_id: Some("vsl-001".into()),
                limit: Some(2),
                ..ChangeRequestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn query_wildcards_match_literally() {
        let svc = test_service().await;
        draft(&svc, "Raise min stock").await;
        draft(&svc, "Fix running hours").await;
        let literal = draft(&svc, "Set 100% load_limit").await;

        let search = |q: &str| ChangeRequestFilter {
            q: Some(q.into()),
            ..ChangeRequestFilter::default()
        };
        let percent = svc.list_change_requests(&search("%")).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].id, literal.id);

        assert!(svc.list_change_requests(&search("r_ise")).await.unwrap().is_empty());
        let underscore = svc.list_change_requests(&search("load_limit")).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert!(svc.list_change_requests(&search("a\\b")).await.unwrap().is_empty());
    }

    #[test]
    fn escape_like_prefixes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn mutations_write_trail() {
        let dir = tempfile::TempDir::new().unwrap();
        let svc = test_service_with_trail(dir.path().to_path_buf()).await;
        let request = submitted(&svc).await;

        let ops = svc.trail().read_vessel("vsl-001").unwrap();
        let kinds: Vec<_> = ops.iter().map(|o| o.op).collect();
        assert_eq!(kinds, vec![TrailOp::Create, TrailOp::Update, TrailOp::Transition]);
        assert!(ops.iter().all(|o| o.id == request.id));
        assert_eq!(ops[2].data["to"], "submitted");
    }
}
