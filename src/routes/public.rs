use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. The only data query here is the
/// approved-entry list; its `status = approved` filter lives in the
/// repository query, so pending and rejected entries can never leak to an
/// anonymous caller.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/v1/bot/
        // Lists the approved catalog entries. Registered with and without
        // the trailing slash; the frontend uses the slash form.
        .route("/api/v1/bot/", get(handlers::get_approved_listings))
        .route("/api/v1/bot", get(handlers::get_approved_listings))
        // POST /api/v1/bot/addApplication
        // Anonymous submission. New entries always start as `pending`.
        .route("/api/v1/bot/addApplication", post(handlers::submit_listing))
        // POST /api/v1/auth/login
        // Credential check; issues the session cookie on success.
        .route("/api/v1/auth/login", post(handlers::login))
}
