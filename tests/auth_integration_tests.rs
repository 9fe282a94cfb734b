use axum::{
    extract::FromRequestParts,
    http::{Method, Request, header, request::Parts},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serial_test::serial;
use std::sync::Arc;
use tg_catalog::{
    AppState, InMemoryRepository,
    auth::AuthAdmin,
    config::AppConfig,
    error::ApiError,
    models::Admin,
    repository::Repository,
    token::{self, Claims},
};
use uuid::Uuid;

const TEST_SECRET: &str = "test-secret-value-1234567890";

fn set_secret(value: Option<&str>) {
    // SAFETY: all tests in this binary are #[serial], so no other thread
    // touches the process environment concurrently.
    unsafe {
        match value {
            Some(v) => std::env::set_var("SECRET", v),
            None => std::env::remove_var("SECRET"),
        }
    }
}

/// Builds an AppState around an in-memory repository holding one seeded
/// administrator. The stored hash is irrelevant here: the gate never looks at
/// passwords, only at token subjects.
async fn state_with_admin() -> (AppState, Admin) {
    let repo = Arc::new(InMemoryRepository::new());
    let admin = repo
        .create_admin("admin", "unused-hash")
        .await
        .expect("in-memory create_admin cannot fail");

    let state = AppState {
        repo,
        config: AppConfig::default(),
    };
    (state, admin)
}

fn parts_with_cookie(token: &str) -> Parts {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::COOKIE, format!("Authorization={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn parts_without_cookie() -> Parts {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn expired_token(subject: Uuid, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject,
        iat: (now - 7200) as usize,
        exp: (now - 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
#[serial]
async fn gate_accepts_a_valid_session() {
    set_secret(Some(TEST_SECRET));
    let (state, admin) = state_with_admin().await;

    let session = token::issue(admin.id).unwrap();
    let mut parts = parts_with_cookie(&session);

    let resolved = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .expect("a valid session must pass the gate");

    assert_eq!(resolved.id, admin.id);
    assert_eq!(resolved.login, "admin");
    assert!(resolved.role.can_moderate());
}

#[tokio::test]
#[serial]
async fn gate_rejects_a_missing_cookie() {
    set_secret(Some(TEST_SECRET));
    let (state, _admin) = state_with_admin().await;

    let mut parts = parts_without_cookie();
    let err = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Authentication(_)));
}

#[tokio::test]
#[serial]
async fn gate_rejects_an_expired_token() {
    set_secret(Some(TEST_SECRET));
    let (state, admin) = state_with_admin().await;

    let mut parts = parts_with_cookie(&expired_token(admin.id, TEST_SECRET));
    let err = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Authentication(_)));
}

#[tokio::test]
#[serial]
async fn gate_rejects_a_token_signed_with_another_secret() {
    set_secret(Some(TEST_SECRET));
    let (state, admin) = state_with_admin().await;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: admin.id,
        iat: now as usize,
        exp: (now + 3600) as usize,
    };
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"a-completely-different-secret"),
    )
    .unwrap();

    let mut parts = parts_with_cookie(&forged);
    let err = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Authentication(_)));
}

#[tokio::test]
#[serial]
async fn gate_rejects_a_subject_that_no_longer_exists() {
    set_secret(Some(TEST_SECRET));
    let (state, _admin) = state_with_admin().await;

    // Cryptographically valid token for an identity absent from the store,
    // the situation left behind by a deleted administrator.
    let session = token::issue(Uuid::new_v4()).unwrap();
    let mut parts = parts_with_cookie(&session);

    let err = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Authentication(_)));
}

#[tokio::test]
#[serial]
async fn gate_reports_a_configuration_error_without_a_secret() {
    set_secret(Some(TEST_SECRET));
    let (state, admin) = state_with_admin().await;
    let session = token::issue(admin.id).unwrap();

    // The secret disappears between issuance and the request. The rejection
    // must be the server-error variant, distinct from unauthenticated.
    set_secret(None);

    let mut parts = parts_with_cookie(&session);
    let err = AuthAdmin::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Configuration(_)));
}
