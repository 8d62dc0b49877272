//! Complaint endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use examdesk_common::AppResult;
use examdesk_core::{ComplaintDetail, SubmitComplaintInput};
use examdesk_db::entities::{
    complaint::{self, ComplaintStatus},
    response, status_history,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::Actor, middleware::AppState, response::ApiResponse};

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

/// Complaint summary for listings.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSummaryResponse {
    pub id: String,
    pub reference_number: String,
    pub student: String,
    pub exam_name: String,
    pub exam_date: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub complaint_type: String,
    pub status: String,
}

impl From<complaint::Model> for ComplaintSummaryResponse {
    fn from(c: complaint::Model) -> Self {
        Self {
            id: c.id,
            reference_number: c.reference_number,
            student: c.full_name,
            exam_name: c.exam_name,
            exam_date: c.exam_date.to_string(),
            created_at: c.created_at.to_rfc3339(),
            complaint_type: c.complaint_type,
            status: c.status.as_str().to_string(),
        }
    }
}

/// Full complaint view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub reference_number: String,
    pub user_id: String,
    pub full_name: String,
    pub student_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub exam_name: String,
    pub exam_date: String,
    pub complaint_type: String,
    pub description: String,
    pub desired_resolution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_url: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<complaint::Model> for ComplaintResponse {
    fn from(c: complaint::Model) -> Self {
        Self {
            id: c.id,
            reference_number: c.reference_number,
            user_id: c.user_id,
            full_name: c.full_name,
            student_id: c.student_id,
            email: c.email,
            phone: c.phone,
            exam_name: c.exam_name,
            exam_date: c.exam_date.to_string(),
            complaint_type: c.complaint_type,
            description: c.description,
            desired_resolution: c.desired_resolution,
            evidence_url: c.evidence_url,
            status: c.status.as_str().to_string(),
            course: c.course,
            department: c.department,
            faculty: c.faculty,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// One admin response in a complaint thread.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    pub id: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
}

impl From<response::Model> for ResponseItem {
    fn from(r: response::Model) -> Self {
        Self {
            id: r.id,
            body: r.body,
            author: r.author_name,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// One status transition in the audit log.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_status: Option<String>,
    pub new_status: String,
    pub changed_by_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<status_history::Model> for HistoryItem {
    fn from(h: status_history::Model) -> Self {
        Self {
            old_status: h.old_status.map(|s| s.as_str().to_string()),
            new_status: h.new_status.as_str().to_string(),
            changed_by_name: h.changed_by_name,
            notes: h.notes,
            created_at: h.created_at.to_rfc3339(),
        }
    }
}

/// Complaint detail response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetailResponse {
    #[serde(flatten)]
    pub complaint: ComplaintResponse,
    pub responses: Vec<ResponseItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_history: Option<Vec<HistoryItem>>,
}

impl From<ComplaintDetail> for ComplaintDetailResponse {
    fn from(detail: ComplaintDetail) -> Self {
        Self {
            complaint: detail.complaint.into(),
            responses: detail.responses.into_iter().map(Into::into).collect(),
            status_history: detail
                .status_history
                .map(|h| h.into_iter().map(Into::into).collect()),
        }
    }
}

/// List complaints visible to the actor.
async fn list_complaints(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintSummaryResponse>>> {
    let complaints = state
        .complaint_service
        .list(&actor, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// Submit response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub reference_number: String,
    pub complaint_id: String,
}

/// Submit a new complaint.
async fn create_complaint(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(input): Json<SubmitComplaintInput>,
) -> AppResult<ApiResponse<SubmitResponse>> {
    let created = state.complaint_service.submit(&actor, input).await?;

    Ok(ApiResponse::ok(SubmitResponse {
        message: "Complaint submitted successfully".to_string(),
        reference_number: created.reference_number,
        complaint_id: created.id,
    }))
}

/// Get one complaint with responses and, for admins, history.
async fn get_complaint(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ComplaintDetailResponse>> {
    let detail = state.complaint_service.get(&actor, &id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

/// Status update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Status update response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub status: String,
    pub history: Vec<HistoryItem>,
}

/// Apply a status transition.
async fn update_status(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<UpdateStatusResponse>> {
    let outcome = state
        .complaint_service
        .update_status(&actor, &id, req.status, req.notes)
        .await?;

    Ok(ApiResponse::ok(UpdateStatusResponse {
        status: outcome.status.as_str().to_string(),
        history: outcome.history.into_iter().map(Into::into).collect(),
    }))
}

/// Add response request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponseRequest {
    pub body: String,
}

/// Add an admin response to a complaint.
async fn add_response(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddResponseRequest>,
) -> AppResult<ApiResponse<ResponseItem>> {
    let created = state
        .complaint_service
        .add_response(&actor, &id, &req.body)
        .await?;

    Ok(ApiResponse::ok(created.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_complaints).post(create_complaint))
        .route("/{id}", get(get_complaint))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/responses", post(add_response))
}
