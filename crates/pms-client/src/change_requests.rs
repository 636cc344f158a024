//! `/api/change-requests` endpoints.

use pms_core::entities::{ChangeRequest, ChangeRequestSummary};
use pms_core::enums::{Category, ChangeRequestStatus};
use pms_core::lifecycle::{ChangeRequestPatch, NewChangeRequest, Review};
use pms_core::responses::{ApproveResponse, ChangeRequestListResponse};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::http::{check_response, read_json};
use crate::{ChangeRequestClient, ClientError};

/// Filters for listing change requests. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub vessel_id: Option<String>,
    pub category: Option<Category>,
    pub status: Option<ChangeRequestStatus>,
    /// Free-text search over title and reason.
    pub q: Option<String>,
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Encoded query string including the leading `?`, or empty when no
    /// filter is set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(vessel) = &self.vessel_id {
            pairs.push(("vesselId", vessel.clone()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if pairs.is_empty() {
            return String::new();
        }
        let encoded: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

/// The server may answer a list with a bare array or a wrapped page.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Page(ChangeRequestListResponse),
    Bare(Vec<ChangeRequestSummary>),
}

impl From<ListBody> for ChangeRequestListResponse {
    fn from(body: ListBody) -> Self {
        match body {
            ListBody::Page(page) => page,
            ListBody::Bare(items) => Self {
                total: u32::try_from(items.len()).unwrap_or(u32::MAX),
                items,
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody<'a> {
    status: ChangeRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_by_user_id: Option<&'a str>,
}

fn item_path(id: &str) -> String {
    format!("/{}", urlencoding::encode(id))
}

async fn read_list(resp: reqwest::Response) -> Result<ChangeRequestListResponse, ClientError> {
    let body: ListBody = read_json(resp).await?;
    Ok(body.into())
}

/// Any 2xx counts as deleted; the body is ignored.
async fn read_deleted(resp: reqwest::Response) -> Result<(), ClientError> {
    check_response(resp).await?;
    Ok(())
}

impl ChangeRequestClient {
    /// `GET /api/change-requests`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails, the server returns a
    /// non-success status, or the response cannot be parsed.
    pub async fn list(&self, query: &ListQuery) -> Result<ChangeRequestListResponse, ClientError> {
        let resp = self
            .request(Method::GET, &query.to_query_string())
            .send()
            .await?;
        read_list(resp).await
    }

    /// `GET /api/change-requests/{id}`, including comments and attachments.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 if the request does not
    /// exist, or another [`ClientError`] on transport or parse failure.
    pub async fn get(&self, id: &str) -> Result<ChangeRequest, ClientError> {
        let resp = self.request(Method::GET, &item_path(id)).send().await?;
        read_json(resp).await
    }

    /// `POST /api/change-requests`. The server assigns the id and requester.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or parse failure.
    pub async fn create(&self, new: &NewChangeRequest) -> Result<ChangeRequest, ClientError> {
        let resp = self.request(Method::POST, "").json(new).send().await?;
        read_json(resp).await
    }

    /// `PUT /api/change-requests/{id}` with the fields present in `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or parse failure. A
    /// request that is no longer editable is refused by the server.
    pub async fn update(
        &self,
        id: &str,
        patch: &ChangeRequestPatch,
    ) -> Result<ChangeRequest, ClientError> {
        let resp = self
            .request(Method::PUT, &item_path(id))
            .json(patch)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `PATCH /api/change-requests/{id}/status`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or parse failure.
    pub async fn set_status(
        &self,
        id: &str,
        status: ChangeRequestStatus,
        reviewer: Option<&str>,
    ) -> Result<ChangeRequest, ClientError> {
        let body = StatusBody {
            status,
            reviewed_by_user_id: reviewer,
        };
        let resp = self
            .request(Method::PATCH, &format!("{}/status", item_path(id)))
            .json(&body)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `PUT /api/change-requests/{id}/approve`. The response carries the
    /// payload for the apply step.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or parse failure.
    pub async fn approve(&self, id: &str, review: &Review) -> Result<ApproveResponse, ClientError> {
        let resp = self
            .request(Method::PUT, &format!("{}/approve", item_path(id)))
            .json(review)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `PUT /api/change-requests/{id}/reject`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or parse failure.
    pub async fn reject(&self, id: &str, review: &Review) -> Result<ChangeRequest, ClientError> {
        let resp = self
            .request(Method::PUT, &format!("{}/reject", item_path(id)))
            .json(review)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `DELETE /api/change-requests/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or status failure.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.request(Method::DELETE, &item_path(id)).send().await?;
        read_deleted(resp).await
    }
}
