//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use examdesk_core::SessionActor;

/// Authenticated actor extractor.
#[derive(Debug, Clone)]
pub struct Actor(pub SessionActor);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the session middleware
        parts
            .extensions
            .get::<SessionActor>()
            .cloned()
            .map(Actor)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Authenticated admin extractor.
///
/// Rejects with 401 (not 403) on a role mismatch, matching the policy of
/// revealing nothing to non-admin actors.
#[derive(Debug, Clone)]
pub struct AdminActor(pub SessionActor);

impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<SessionActor>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if !actor.is_admin() {
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
        }

        Ok(Self(actor))
    }
}
