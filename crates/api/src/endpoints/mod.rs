//! API endpoints.

#![allow(missing_docs)]

mod admin;
pub mod auth;
mod complaints;
mod notifications;
mod profile;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/complaints", complaints::router())
        .nest("/notifications", notifications::router())
        .nest("/profile", profile::router())
        .nest("/admin", admin::router())
}
