//! HTTP API layer for examdesk.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, complaints, notifications, profile, admin stats
//! - **Extractors**: session-cookie authentication
//! - **Middleware**: session parsing, logging, CORS
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, SESSION_COOKIE, session_middleware};
