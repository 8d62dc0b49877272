//! Profile endpoints.

use axum::{Json, Router, extract::State, routing::patch};
use examdesk_common::AppResult;
use examdesk_core::UpdateProfileInput;

use crate::{
    endpoints::auth::UserResponse, extractors::Actor, middleware::AppState,
    response::ApiResponse,
};

/// Update the current user's profile.
async fn update_profile(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .account_service
        .update_profile(&actor.user_id, input)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", patch(update_profile))
}
