//! Table layouts for the responses `pms` prints.

use chrono::{DateTime, Utc};
use pms_core::entities::{AuditEntry, ChangeRequest, ChangeRequestSummary, Snapshot};
use pms_core::enums::TargetType;
use pms_core::responses::{
    ApproveResponse, AttachmentResponse, ChangeRequestListResponse, CommentResponse,
    DeleteResponse, PushResponse,
};

use super::Tabular;
use super::table::{Cell, Column, Table, col, flex};

const DETAIL: &[Column] = &[col("field"), flex("value")];
const CHANGES: &[Column] = &[col("field"), col("label"), flex("before"), flex("after")];
const SUMMARY: &[Column] = &[
    col("id"),
    col("status"),
    flex("title"),
    col("target"),
    col("changes"),
    col("updated"),
];
const COMMENTS: &[Column] = &[col("user"), col("at"), flex("message")];
const ATTACHMENTS: &[Column] = &[col("filename"), flex("url"), col("at")];
const AUDIT: &[Column] = &[
    col("id"),
    col("at"),
    col("entity"),
    col("entity id"),
    col("action"),
    col("actor"),
];

fn when(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn or_dash(value: Option<String>) -> Cell {
    value.unwrap_or_else(|| String::from("-")).into()
}

fn target(target_type: Option<TargetType>, target_id: Option<&str>) -> Cell {
    match (target_type, target_id) {
        (Some(kind), Some(id)) => format!("{kind} {id}").into(),
        (Some(kind), None) => kind.to_string().into(),
        _ => "-".into(),
    }
}

fn detail(name: &str, value: impl Into<Cell>) -> Vec<Cell> {
    vec![name.into(), value.into()]
}

impl Tabular for ChangeRequest {
    fn tables(&self) -> Vec<Table> {
        let reviewed = self
            .reviewed_by_user_id
            .as_ref()
            .map(|by| match self.reviewed_at {
                Some(at) => format!("{by} at {}", when(at)),
                None => by.clone(),
            });

        let mut tables = vec![Table::new(DETAIL).with_rows([
            detail("id", self.id.as_str()),
            detail("title", self.title.as_str()),
            detail("status", Cell::status(self.status)),
            detail("category", self.category.to_string()),
            detail("vessel", self.vessel_id.as_str()),
            detail("target", target(self.target_type, self.target_id.as_deref())),
            detail("reason", or_dash(self.reason.clone())),
            detail("requested by", self.requested_by_user_id.as_str()),
            detail("updated", when(self.updated_at)),
            detail("submitted", or_dash(self.submitted_at.map(when))),
            detail("reviewed", or_dash(reviewed)),
        ])];

        tables.push(
            Table::titled("Proposed changes", CHANGES).with_rows(self.proposed_changes.iter().map(
                |change| {
                    vec![
                        change.path.to_string().into(),
                        change.label.as_str().into(),
                        or_dash(change.before.as_ref().map(ToString::to_string)),
                        change.after.to_string().into(),
                    ]
                },
            )),
        );

        if let Some(preview) = &self.move_preview {
            tables.push(Table::titled("Move", DETAIL).with_rows([
                detail("from", format!("{}  {}", preview.old_code, preview.old_path)),
                detail("to", format!("{}  {}", preview.new_code_preview, preview.new_path)),
            ]));
        }
        if !self.comments.is_empty() {
            tables.push(Table::titled("Comments", COMMENTS).with_rows(self.comments.iter().map(
                |comment| {
                    vec![
                        comment.user_id.as_str().into(),
                        when(comment.created_at).into(),
                        comment.message.as_str().into(),
                    ]
                },
            )));
        }
        if !self.attachments.is_empty() {
            tables.push(Table::titled("Attachments", ATTACHMENTS).with_rows(
                self.attachments.iter().map(|attachment| {
                    vec![
                        attachment.filename.as_str().into(),
                        attachment.url.as_str().into(),
                        when(attachment.created_at).into(),
                    ]
                }),
            ));
        }
        tables
    }
}

fn summary_row(summary: &ChangeRequestSummary) -> Vec<Cell> {
    vec![
        summary.id.as_str().into(),
        Cell::status(summary.status),
        summary.title.as_str().into(),
        target(summary.target_type, summary.target_id.as_deref()),
        summary.change_count.to_string().into(),
        when(summary.updated_at).into(),
    ]
}

impl Tabular for ChangeRequestListResponse {
    fn tables(&self) -> Vec<Table> {
        vec![Table::new(SUMMARY).with_rows(self.items.iter().map(summary_row))]
    }
}

impl Tabular for ApproveResponse {
    fn tables(&self) -> Vec<Table> {
        let approved = &self.approved;
        let mut tables = vec![Table::titled("Approved", DETAIL).with_rows([
            detail("request", approved.request_id.as_str()),
            detail(
                "target",
                target(Some(approved.target_type), Some(&approved.target_id)),
            ),
            detail("changes", approved.changes.len().to_string()),
            detail(
                "move to",
                or_dash(approved.move_preview.as_ref().map(|m| m.new_code_preview.clone())),
            ),
        ])];
        tables.extend(self.change_request.tables());
        tables
    }
}

impl Tabular for CommentResponse {
    fn tables(&self) -> Vec<Table> {
        const COLUMNS: &[Column] = &[col("request"), col("user"), col("at"), flex("message")];
        vec![Table::new(COLUMNS).with_rows([vec![
            self.change_request_id.as_str().into(),
            self.comment.user_id.as_str().into(),
            when(self.comment.created_at).into(),
            self.comment.message.as_str().into(),
        ]])]
    }
}

impl Tabular for AttachmentResponse {
    fn tables(&self) -> Vec<Table> {
        const COLUMNS: &[Column] = &[col("request"), col("filename"), flex("url"), col("at")];
        vec![Table::new(COLUMNS).with_rows([vec![
            self.change_request_id.as_str().into(),
            self.attachment.filename.as_str().into(),
            self.attachment.url.as_str().into(),
            when(self.attachment.created_at).into(),
        ]])]
    }
}

impl Tabular for DeleteResponse {
    fn tables(&self) -> Vec<Table> {
        const COLUMNS: &[Column] = &[col("id"), col("deleted")];
        vec![Table::new(COLUMNS).with_rows([vec![
            self.id.as_str().into(),
            self.deleted.to_string().into(),
        ]])]
    }
}

impl Tabular for PushResponse {
    fn tables(&self) -> Vec<Table> {
        const COLUMNS: &[Column] = &[col("local"), col("remote"), col("submitted")];
        vec![Table::new(COLUMNS).with_rows([vec![
            self.local_id.as_str().into(),
            self.remote_id.as_str().into(),
            self.submitted.to_string().into(),
        ]])]
    }
}

impl Tabular for Snapshot {
    fn tables(&self) -> Vec<Table> {
        vec![
            Table::new(DETAIL).with_rows([
                detail("target", format!("{} {}", self.target_type, self.target_id)),
                detail("key", self.display_key.as_str()),
                detail("name", self.display_name.as_str()),
                detail("path", self.display_path.as_str()),
                detail("captured", when(self.captured_at)),
            ]),
            Table::titled("Fields", DETAIL).with_rows(
                self.fields
                    .iter()
                    .map(|(key, value)| detail(key, value.to_string())),
            ),
        ]
    }
}

impl Tabular for Vec<AuditEntry> {
    fn tables(&self) -> Vec<Table> {
        vec![Table::new(AUDIT).with_rows(self.iter().map(|entry| {
            vec![
                entry.id.as_str().into(),
                when(entry.created_at).into(),
                entry.entity_type.to_string().into(),
                entry.entity_id.as_str().into(),
                entry.action.to_string().into(),
                entry.actor_id.as_str().into(),
            ]
        }))]
    }
}
