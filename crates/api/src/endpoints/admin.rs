//! Admin statistics endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use examdesk_common::AppResult;
use examdesk_core::{Analytics, AnalyticsFilter, OverviewStats};

use crate::{extractors::AdminActor, middleware::AppState, response::ApiResponse};

/// Dashboard overview numbers.
async fn stats(
    AdminActor(_actor): AdminActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<OverviewStats>> {
    let overview = state.stats_service.overview().await?;
    Ok(ApiResponse::ok(overview))
}

/// Filtered analytics view.
async fn analytics(
    AdminActor(_actor): AdminActor,
    State(state): State<AppState>,
    Query(filter): Query<AnalyticsFilter>,
) -> AppResult<ApiResponse<Analytics>> {
    let analytics = state.stats_service.analytics(filter).await?;
    Ok(ApiResponse::ok(analytics))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/analytics", get(analytics))
}
