//! Notifications endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
};
use examdesk_common::AppResult;
use examdesk_db::entities::notification::{self, NotificationType};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{Actor, AdminActor},
    middleware::AppState,
    response::ApiResponse,
};

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Maximum results (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    20
}

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: notification_type_to_string(&n.notification_type),
            related_id: n.related_id,
            is_read: n.is_read,
            read_at: n.read_at.map(|t| t.to_rfc3339()),
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

fn notification_type_to_string(t: &NotificationType) -> String {
    t.as_str().to_string()
}

/// Get notifications for the authenticated user.
async fn list_notifications(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list_for_user(&actor.user_id, query.limit)
        .await?;

    Ok(ApiResponse::ok(
        notifications.into_iter().map(Into::into).collect(),
    ))
}

/// Unread count response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Get unread notification count.
async fn unread_count(
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state
        .notification_service
        .unread_count(&actor.user_id)
        .await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}

/// Success-flag response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
}

/// Mark a notification as read.
///
/// A no-op (still success) when the notification does not exist or
/// belongs to another user.
async fn mark_read(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SuccessResponse>> {
    state
        .notification_service
        .mark_read(&id, &actor.user_id)
        .await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}

/// Delete a notification, with the same owner scoping as mark-read.
async fn delete_notification(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SuccessResponse>> {
    state
        .notification_service
        .delete(&id, &actor.user_id)
        .await?;
    Ok(ApiResponse::ok(SuccessResponse { success: true }))
}

/// Cleanup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    #[serde(default = "default_cleanup_days")]
    pub days: u32,
    #[serde(default = "default_true")]
    pub only_if_read: bool,
}

const fn default_cleanup_days() -> u32 {
    30
}

const fn default_true() -> bool {
    true
}

/// Cleanup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub count: u64,
}

/// Bulk-delete old notifications (maintenance, admin only).
async fn cleanup(
    AdminActor(_actor): AdminActor,
    State(state): State<AppState>,
    Json(req): Json<CleanupRequest>,
) -> AppResult<ApiResponse<CleanupResponse>> {
    let count = state
        .notification_service
        .cleanup_older_than(req.days, req.only_if_read)
        .await?;
    Ok(ApiResponse::ok(CleanupResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/{id}/read", patch(mark_read))
        .route("/{id}", delete(delete_notification))
        .route("/cleanup", post(cleanup))
}
