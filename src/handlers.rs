use crate::{
    AppState,
    auth::{self, AuthAdmin, require_moderator},
    error::ApiError,
    models::{
        AdminProfile, ApplicationsResponse, CreateListingRequest, DeleteRequest, Listing,
        ListingKind, ListingStatus, LoginRequest, LoginResponse, MessageResponse, NewListing,
        SubmitResponse, UpdateStatusRequest, UpdateStatusResponse, ValidateResponse,
    },
    token::{self, SESSION_COOKIE, SESSION_TTL_SECS},
};
use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// ListingFilter
///
/// Accepted query parameters for the admin listing endpoint
/// (GET /api/v1/admin/). The status value arrives as a plain string and is
/// validated against the legal moderation states.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListingFilter {
    /// Optional filter: return only entries in this moderation status.
    pub status: Option<String>,
}

// --- Handlers ---

/// login
///
/// [Public Route] Verifies the supplied credentials against the credential
/// store and, on success, issues a 30-day session token delivered as the
/// `Authorization` cookie (HttpOnly, SameSite=Lax, Path=/).
///
/// An unknown login and a wrong password produce the identical 401 response.
/// A missing signing secret is a 500, reported before any cookie is set.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid login or password"),
        (status = 500, description = "Missing signing secret")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let admin = auth::authenticate(&state.repo, &payload.login, &payload.password).await?;

    let token = token::issue(admin.id)?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS));

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user_id: admin.id,
        }),
    ))
}

/// validate
///
/// [Authenticated Route] Session check. Reaching this handler at all means
/// the Auth Gate accepted the cookie, so it simply echoes the resolved
/// identity back.
#[utoipa::path(
    get,
    path = "/api/v1/auth/validate",
    responses(
        (status = 200, description = "Session is valid", body = ValidateResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn validate(admin: AuthAdmin) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        message: "User validated".to_string(),
        user: AdminProfile {
            id: admin.id,
            login: admin.login,
            role: admin.role,
        },
    })
}

/// logout
///
/// [Authenticated Route] Ends the browser session by overwriting the
/// `Authorization` cookie with an expired one. The token itself stays
/// cryptographically valid until its expiry; only secret rotation revokes
/// outstanding tokens.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn logout(_admin: AuthAdmin, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/");

    (
        jar.remove(removal),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// submit_listing
///
/// [Public Route] Accepts an anonymous catalog submission. The kind string
/// is validated against the legal values; everything else is stored
/// verbatim. The new entry always starts as `pending` and is invisible to
/// the public list until an administrator approves it.
#[utoipa::path(
    post,
    path = "/api/v1/bot/addApplication",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Submitted", body = SubmitResponse),
        (status = 400, description = "Illegal kind value or malformed payload")
    )
)]
pub async fn submit_listing(
    State(state): State<AppState>,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let kind = ListingKind::parse(&payload.kind).ok_or_else(|| {
        ApiError::InputValidation(
            "Invalid project type. Allowed values: bot, channel, group".to_string(),
        )
    })?;

    let listing = state
        .repo
        .create_listing(NewListing {
            name: payload.name,
            category: payload.category,
            short_description: payload.short_description,
            full_description: payload.full_description,
            link: payload.link,
            image: payload.image,
            tags: payload.tags,
            date: payload.date,
            kind,
        })
        .await?;

    Ok(Json(SubmitResponse {
        message: "Application submitted successfully".to_string(),
        application: listing,
    }))
}

/// get_approved_listings
///
/// [Public Route] The only data query reachable without a session. Returns
/// exactly the entries whose current status is `approved`; the filter is
/// applied in the repository query, not after the fact.
#[utoipa::path(
    get,
    path = "/api/v1/bot/",
    responses((status = 200, description = "Approved entries", body = ApplicationsResponse))
)]
pub async fn get_approved_listings(
    State(state): State<AppState>,
) -> Result<Json<ApplicationsResponse>, ApiError> {
    let applications = state.repo.list_by_status(ListingStatus::Approved).await?;

    Ok(Json(ApplicationsResponse { applications }))
}

/// get_all_listings
///
/// [Admin Route] Returns every entry regardless of status, optionally
/// narrowed to a single status via `?status=`. This is the moderation queue
/// view.
#[utoipa::path(
    get,
    path = "/api/v1/admin/",
    params(ListingFilter),
    responses(
        (status = 200, description = "All entries", body = [Listing]),
        (status = 400, description = "Illegal status filter"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn get_all_listings(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    require_moderator(&admin)?;

    let listings = match filter.status {
        Some(raw) => {
            let status = ListingStatus::parse(&raw).ok_or_else(|| {
                ApiError::InputValidation(
                    "Invalid status. Allowed values: pending, approved, rejected".to_string(),
                )
            })?;
            state.repo.list_by_status(status).await?
        }
        None => state.repo.list_all().await?,
    };

    Ok(Json(listings))
}

/// update_listing_status
///
/// [Admin Route] The moderation transition. Validates the requested status
/// against the three legal values (an illegal value is rejected before the
/// registry is touched, leaving the stored status unchanged), then
/// overwrites the entry's status unconditionally and refreshes `updated_at`.
/// Any legal state may move to any other legal state, including itself.
#[utoipa::path(
    put,
    path = "/api/v1/admin/update",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusResponse),
        (status = 400, description = "Illegal status value or unparseable id"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Unknown entry")
    )
)]
pub async fn update_listing_status(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    require_moderator(&admin)?;

    let status = ListingStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::InputValidation(
            "Invalid status. Allowed values: pending, approved, rejected".to_string(),
        )
    })?;

    let id = Uuid::parse_str(&payload.id)
        .map_err(|_| ApiError::InputValidation("Invalid listing id".to_string()))?;

    match state.repo.set_status(id, status).await? {
        Some(application) => Ok(Json(UpdateStatusResponse {
            ok: true,
            application,
        })),
        None => Err(ApiError::NotFound("Application not found".to_string())),
    }
}

/// delete_listing
///
/// [Admin Route] Permanently removes an entry, whatever its status. The id
/// is gone for good; ids are never reused.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/delete",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Unparseable id"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Unknown entry")
    )
)]
pub async fn delete_listing(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Json(payload): Json<DeleteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_moderator(&admin)?;

    let id = Uuid::parse_str(&payload.id)
        .map_err(|_| ApiError::InputValidation("Invalid listing id".to_string()))?;

    if state.repo.delete_listing(id).await? {
        Ok(Json(MessageResponse {
            message: "Application deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Application not found".to_string()))
    }
}
