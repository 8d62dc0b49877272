//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use examdesk_core::{
    AccountService, ComplaintService, NotificationService, PasswordResetService, SessionActor,
    StatsService,
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub complaint_service: ComplaintService,
    pub notification_service: NotificationService,
    pub password_reset_service: PasswordResetService,
    pub stats_service: StatsService,
}

/// Session middleware.
///
/// Parses the trusted session cookie into a [`SessionActor`] and stores
/// it in request extensions for the extractors. A missing or malformed
/// cookie just leaves the request unauthenticated; rejection is the
/// extractors' job.
pub async fn session_middleware(jar: CookieJar, mut req: Request<Body>, next: Next) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && let Some(actor) = parse_session_cookie(cookie.value())
    {
        req.extensions_mut().insert(actor);
    }

    next.run(req).await
}

/// Parse a percent-encoded JSON session cookie value.
#[must_use]
pub fn parse_session_cookie(raw: &str) -> Option<SessionActor> {
    let decoded = urlencoding::decode(raw).ok()?;
    serde_json::from_str(&decoded).ok()
}

/// Serialize a session actor into the cookie value format.
#[must_use]
pub fn encode_session_cookie(actor: &SessionActor) -> Option<String> {
    let json = serde_json::to_string(actor).ok()?;
    Some(urlencoding::encode(&json).into_owned())
}
