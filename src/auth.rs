use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::Admin,
    repository::RepositoryState,
    token::{self, SESSION_COOKIE},
};

/// Role
///
/// The capability set attached to a resolved identity. Today every
/// authenticated identity is an administrator, but the role is modeled as an
/// explicit enumeration and checked through `can_moderate` so adding a second
/// role later cannot silently widen anyone's permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    /// Capability predicate for the moderation endpoints.
    pub fn can_moderate(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// AuthAdmin
///
/// The resolved identity of an authenticated request; the output of the Auth
/// Gate. Handlers receive this struct only after the session token has been
/// verified and the subject confirmed to still exist in the credential store.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub id: Uuid,
    pub login: String,
    pub role: Role,
}

/// require_moderator
///
/// Capability check used by the moderation handlers. Rejection mirrors the
/// gate's own 401 rather than introducing a new status, since no
/// lesser-privileged session can exist today.
pub fn require_moderator(admin: &AuthAdmin) -> Result<(), ApiError> {
    if admin.role.can_moderate() {
        Ok(())
    } else {
        Err(ApiError::Authentication(
            "Authentication required".to_string(),
        ))
    }
}

/// AuthAdmin Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthAdmin usable as a
/// function argument in any gated handler. The gate is strictly binary: a
/// request either proceeds with the identity attached or is short-circuited
/// with the rejection below, and no handler runs after a rejection.
///
/// The sequence is:
/// 1. Extract the session token from the `Authorization` cookie; absent
///    cookie → 401.
/// 2. Resolve the signing secret; an unconfigured server → 500, distinct
///    from the unauthenticated case.
/// 3. Verify the token via the codec; every verification failure → 401.
/// 4. Look the subject up in the credential store; a subject that no longer
///    exists (deleted administrator with a still-valid token) → 401.
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token_value = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or_else(|| {
                ApiError::Authentication("Authorization cookie required".to_string())
            })?;

        let secret = token::signing_secret()?;

        // The precise failure mode (malformed, bad signature, algorithm
        // mismatch, expired) is logged but collapsed into one uniform 401.
        let subject = token::verify(&token_value, &secret).map_err(|err| {
            tracing::debug!("token verification failed: {}", err);
            ApiError::Authentication("Invalid token".to_string())
        })?;

        // Same uniform message when the subject no longer exists, so the
        // response does not reveal which identities are live.
        let admin = repo
            .get_admin(subject)
            .await?
            .ok_or_else(|| ApiError::Authentication("Invalid token".to_string()))?;

        Ok(AuthAdmin {
            id: admin.id,
            login: admin.login,
            role: Role::Admin,
        })
    }
}

// --- Credential verification ---

/// hash_password
///
/// Produces an Argon2id hash (PHC string format) with a fresh random salt.
/// Used by the startup seed path and by tests; request handling only ever
/// verifies.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("password hashing failed: {}", err);
            ApiError::Configuration("Server configuration error".to_string())
        })
}

/// verify_password
///
/// Constant-time comparison of the supplied plaintext against the stored
/// Argon2id hash. An unparseable stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// authenticate
///
/// Resolves a login/password pair to an administrator identity. An unknown
/// login and a wrong password produce the exact same error value, so the
/// response does not leak which logins exist.
pub async fn authenticate(
    repo: &RepositoryState,
    login: &str,
    password: &str,
) -> Result<Admin, ApiError> {
    let invalid = || ApiError::Authentication("Invalid login or password".to_string());

    let admin = repo.get_admin_by_login(login).await?.ok_or_else(invalid)?;

    if verify_password(password, &admin.password_hash) {
        Ok(admin)
    } else {
        Err(invalid())
    }
}
