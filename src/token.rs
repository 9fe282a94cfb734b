use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "Authorization";

/// Fixed session lifetime: 30 days, set at issuance. Tokens are stateless and
/// cannot be revoked individually before expiry; rotating `SECRET` invalidates
/// all of them at once.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 30;

/// The only signature scheme this codec accepts. Tokens declaring any other
/// algorithm (including `none`) are rejected during verification.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims
///
/// The payload signed into every session token. `sub` is the administrator's
/// id; `exp`/`iat` are Unix timestamps in seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// VerifyError
///
/// The distinct ways verification can fail. All of them currently map to the
/// same 401 rejection at the gate, but they are kept separate so tests (and
/// any future policy) can tell them apart.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token is not a well-formed JWT")]
    Malformed,
    #[error("token signature does not match")]
    BadSignature,
    #[error("token algorithm is not the expected HMAC scheme")]
    AlgorithmMismatch,
    #[error("token has expired")]
    Expired,
}

/// signing_secret
///
/// Resolves the symmetric signing secret from the environment. Read on every
/// call rather than cached at startup, so repairing a missing `SECRET` takes
/// effect without a restart. An absent or empty value is a configuration
/// error; the codec never falls back to a default key.
pub fn signing_secret() -> Result<String, ApiError> {
    match std::env::var("SECRET") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(ApiError::Configuration(
            "Server configuration error".to_string(),
        )),
    }
}

/// issue
///
/// Produces a signed session token for the given administrator id, expiring
/// `SESSION_TTL_SECS` from now. Fails closed when the signing secret is
/// absent.
pub fn issue(subject: Uuid) -> Result<String, ApiError> {
    let secret = signing_secret()?;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject,
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };

    encode(
        &Header::new(SIGNING_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!("token signing failed: {:?}", err);
        ApiError::Configuration("Failed to create token".to_string())
    })
}

/// verify
///
/// Checks the token's signature against `secret`, pins the signing algorithm
/// to HS256, validates expiry, and returns the subject id on success.
///
/// A token whose payload expiry is in the past reports `Expired` even when
/// its signature is also invalid.
pub fn verify(token: &str, secret: &str) -> Result<Uuid, VerifyError> {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.validate_exp = true;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims.sub),
        Err(err) => Err(match err.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidSignature => {
                if payload_expired(token) {
                    VerifyError::Expired
                } else {
                    VerifyError::BadSignature
                }
            }
            ErrorKind::InvalidAlgorithm => VerifyError::AlgorithmMismatch,
            _ => VerifyError::Malformed,
        }),
    }
}

/// Inspects the (unverified) claims segment for a past expiry. Used only to
/// pick the right error variant once signature validation has already failed;
/// never to accept a token.
fn payload_expired(token: &str) -> bool {
    let Some(payload) = token.split('.').nth(1) else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<Claims>(&bytes) else {
        return false;
    };
    (claims.exp as i64) <= Utc::now().timestamp()
}
