/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated
/// modules. Access control is applied explicitly at the module level (via
/// Axum layers), so a route can only end up behind the wrong gate by being
/// placed in the wrong module.

/// Routes accessible to all users (anonymous submission, approved-only
/// reads, and login itself).
pub mod public;

/// Routes behind the Auth Gate that any valid session may call.
pub mod authenticated;

/// Moderation routes: behind the Auth Gate plus the moderator capability
/// check inside each handler.
pub mod admin;
