use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;

// --- Core Application Schemas (Mapped to Database) ---

/// Admin
///
/// The canonical administrator identity record stored in the `administrators`
/// table. There is exactly one privileged actor in the system; the record is
/// seeded out of band and is read-only as far as request handling goes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Admin {
    pub id: Uuid,
    /// The unique login name used for authentication.
    pub login: String,
    /// Argon2id hash in PHC string format. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// ListingKind
///
/// The kind of catalog entry a submitter registers. Serialized as `bot`,
/// `channel` or `group`; anything else is rejected at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    #[default]
    Bot,
    Channel,
    Group,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Bot => "bot",
            ListingKind::Channel => "channel",
            ListingKind::Group => "group",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bot" => Some(ListingKind::Bot),
            "channel" => Some(ListingKind::Channel),
            "group" => Some(ListingKind::Group),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ListingStatus
///
/// The moderation state of a listing. Every entry starts as `Pending`; an
/// administrator may move it to any other legal state (including back) at any
/// time. Only `Approved` entries are publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }

    /// Returns None for anything outside the three legal values; the caller
    /// is expected to turn that into an input-validation failure.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ListingStatus::Pending),
            "approved" => Some(ListingStatus::Approved),
            "rejected" => Some(ListingStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both enums are stored as plain TEXT columns; these impls delegate the sqlx
// encoding to the string representation so no database enum type is needed.

impl sqlx::Type<sqlx::Postgres> for ListingKind {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &<sqlx::Postgres as sqlx::Database>::TypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for ListingKind {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ListingKind {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Self::parse(s).ok_or_else(|| format!("unknown listing kind: {s}").into())
    }
}

impl sqlx::Type<sqlx::Postgres> for ListingStatus {
    fn type_info() -> <sqlx::Postgres as sqlx::Database>::TypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &<sqlx::Postgres as sqlx::Database>::TypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for ListingStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ListingStatus {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Self::parse(s).ok_or_else(|| format!("unknown listing status: {s}").into())
    }
}

/// Listing
///
/// A submitted catalog entry from the `listings` table. This is the primary
/// data structure of the moderation workflow and the only record the public
/// actor ever sees (filtered to `status = approved`).
///
/// JSON field names follow the frontend contract: camelCase, with the kind
/// field exposed as `type`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Assigned by the registry at creation; immutable and never recycled.
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub short_description: String,
    pub full_description: String,
    /// External link to the bot/channel/group itself.
    pub link: String,
    pub image: Option<String>,
    /// Free-form labels. Order is not significant and duplicates are allowed.
    pub tags: Vec<String>,
    /// Caller-supplied submission date string; stored verbatim, not validated
    /// as a calendar date.
    pub date: String,
    /// `type` is a reserved keyword in Rust, so the field is named `kind`
    /// internally and renamed on the wire.
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub status: ListingStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// NewListing
///
/// Validated input for the registry's create operation. Built by the submit
/// handler after the kind string has been checked; the registry assigns the
/// id, forces `status = pending` and stamps both timestamps with the same
/// instant.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub category: String,
    pub short_description: String,
    pub full_description: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub date: String,
    pub kind: ListingKind,
}

// --- Request Payloads (Input Schemas) ---

/// CreateListingRequest
///
/// Input payload for the public submission endpoint
/// (POST /api/v1/bot/addApplication). `type` arrives as a plain string and is
/// validated against the legal kind values in the handler.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: String,
    pub category: String,
    pub short_description: String,
    pub full_description: String,
    pub link: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// LoginRequest
///
/// Input payload for POST /api/v1/auth/login. The password only ever exists
/// in memory for the duration of the request; it is never persisted or
/// logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// UpdateStatusRequest
///
/// Input payload for the moderation transition (PUT /api/v1/admin/update).
/// Both fields arrive as strings and are validated in the handler so an
/// illegal value produces a 400 without touching the stored entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

/// DeleteRequest
///
/// Input payload for the admin delete endpoint (DELETE /api/v1/admin/delete).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteRequest {
    pub id: String,
}

// --- Response Schemas (Output) ---

/// AdminProfile
///
/// The administrator identity as exposed by the validate endpoint. Carries
/// the role so the client can reason about capabilities; the password hash
/// never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminProfile {
    pub id: Uuid,
    pub login: String,
    pub role: Role,
}

/// MessageResponse
///
/// Minimal success envelope: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

/// LoginResponse
///
/// Success envelope for login. The session token itself travels in the
/// `Authorization` cookie, not in the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// ValidateResponse
///
/// Success envelope for the session check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ValidateResponse {
    pub message: String,
    pub user: AdminProfile,
}

/// ApplicationsResponse
///
/// Envelope for the public approved-listing query:
/// `{"applications": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplicationsResponse {
    pub applications: Vec<Listing>,
}

/// SubmitResponse
///
/// Envelope returned on successful submission: confirmation message plus the
/// stored entry (including its generated id and `pending` status).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubmitResponse {
    pub message: String,
    pub application: Listing,
}

/// UpdateStatusResponse
///
/// Envelope returned by the moderation transition with the refreshed entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateStatusResponse {
    pub ok: bool,
    pub application: Listing,
}
