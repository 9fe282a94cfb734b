use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Session-scoped endpoints: any request carrying a valid `Authorization`
/// cookie may call these. The Auth Gate layer above this module guarantees
/// every handler here receives a resolved `AuthAdmin`.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/v1/auth/validate
        // Confirms the session is still valid and returns the identity.
        .route("/api/v1/auth/validate", get(handlers::validate))
        // POST /api/v1/auth/logout
        // Clears the session cookie. The token itself remains valid until
        // expiry; this only removes it from the browser.
        .route("/api/v1/auth/logout", post(handlers::logout))
}
