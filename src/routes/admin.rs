use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, put},
};

/// Admin Router Module
///
/// The moderation surface. The whole module sits behind the Auth Gate
/// layer, and each handler additionally runs the `require_moderator`
/// capability check on the resolved identity.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/v1/admin/?status=...
        // The moderation queue: every entry regardless of status, with an
        // optional single-status filter. Registered with and without the
        // trailing slash; the frontend uses the slash form.
        .route("/api/v1/admin/", get(handlers::get_all_listings))
        .route("/api/v1/admin", get(handlers::get_all_listings))
        // PUT /api/v1/admin/update
        // The status transition: body `{id, status}`. Any legal status may
        // be written over any other.
        .route("/api/v1/admin/update", put(handlers::update_listing_status))
        // DELETE /api/v1/admin/delete
        // Removes an entry permanently: body `{id}`.
        .route("/api/v1/admin/delete", delete(handlers::delete_listing))
}
