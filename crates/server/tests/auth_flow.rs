use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::{self, AppState};
use service::auth::password::PasswordHasher;
use service::auth::repository::mock::MockStorage;
use service::auth::repository::{StorageError, UserSaver};
use service::auth::token::verify_token;
use service::auth::{AuthConfig, AuthService};

const APP_ID: i32 = 1;
const APP_SECRET: &str = "test-secret";

fn auth_config() -> AuthConfig {
    AuthConfig { token_ttl: Duration::from_secs(3600), hasher: PasswordHasher::with_cost(8, 1, 1).unwrap() }
}

fn build_app() -> (Arc<MockStorage>, Router) {
    let storage = Arc::new(MockStorage::new().with_app(APP_ID, "test", APP_SECRET));
    let auth = AuthService::with_storage(Arc::clone(&storage), auth_config());
    (storage, routes::build_router(AppState::new(auth), Duration::from_secs(5)))
}

async fn post(app: &Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?;
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let (_, app) = build_app();
    let req = Request::builder().uri("/health").body(Body::empty())?;
    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn test_register_login_and_is_admin_flow() -> anyhow::Result<()> {
    let (storage, app) = build_app();

    let (status, body) = post(&app, "/auth/register", json!({"email": "alice@example.com", "password": "S3cure!"})).await?;
    assert_eq!(status, StatusCode::OK);
    let user_id = body["user_id"].as_i64().expect("user_id");

    let (status, body) = post(
        &app,
        "/auth/login",
        json!({"email": "alice@example.com", "password": "S3cure!", "app_id": APP_ID}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token");
    let claims = verify_token(token, APP_SECRET.as_bytes())?;
    assert_eq!((claims.uid, claims.email.as_str(), claims.app_id), (user_id, "alice@example.com", APP_ID));

    let (status, body) = post(&app, "/auth/is_admin", json!({"user_id": user_id})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"is_admin": false}));

    storage.set_admin(user_id, true)?;
    let (_, body) = post(&app, "/auth/is_admin", json!({"user_id": user_id})).await?;
    assert_eq!(body, json!({"is_admin": true}));
    Ok(())
}

#[tokio::test]
async fn test_missing_fields_are_rejected_before_the_service() -> anyhow::Result<()> {
    let (storage, app) = build_app();

    let cases = [
        ("/auth/login", json!({"password": "pw", "app_id": 1}), "email is required"),
        ("/auth/login", json!({"email": "a@example.com", "app_id": 1}), "password is required"),
        ("/auth/login", json!({"email": "a@example.com", "password": "pw"}), "app_id is required"),
        ("/auth/register", json!({"email": "", "password": "pw"}), "email is required"),
        ("/auth/register", json!({"email": "a@example.com"}), "password is required"),
        ("/auth/is_admin", json!({}), "user_id is required"),
    ];
    for (uri, body, message) in cases {
        let (status, resp) = post(&app, uri, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {resp}");
        assert_eq!(resp["error"], message);
    }
    assert_eq!(storage.user_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_bodies_are_invalid_argument() -> anyhow::Result<()> {
    let (storage, app) = build_app();

    let cases = [
        ("/auth/login", json!({"email": null, "password": "pw", "app_id": 1})),
        ("/auth/login", json!({"email": "a@example.com", "password": "pw", "app_id": "1"})),
        ("/auth/login", json!({"email": "a@example.com", "password": "pw", "app_id": 4294967296_i64})),
        ("/auth/register", json!({"email": 42, "password": "pw"})),
        ("/auth/is_admin", json!({"user_id": true})),
    ];
    for (uri, body) in cases {
        let (status, resp) = post(&app, uri, body.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}: {resp}");
        assert_eq!(resp["code"], 1000);
        assert!(resp["error"].as_str().is_some_and(|m| m.starts_with("invalid request body")));
    }

    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"email":"a@example.com","password":"pw"}"#))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await?)?;
    assert_eq!(body["code"], 1000);

    assert_eq!(storage.user_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_domain_errors_map_to_statuses() -> anyhow::Result<()> {
    let (_, app) = build_app();
    post(&app, "/auth/register", json!({"email": "bob@example.com", "password": "pw"})).await?;

    let (status, body) = post(&app, "/auth/register", json!({"email": "bob@example.com", "password": "pw"})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1003);

    let (wrong_pw, wrong_pw_body) =
        post(&app, "/auth/login", json!({"email": "bob@example.com", "password": "nope", "app_id": APP_ID})).await?;
    let (unknown, unknown_body) =
        post(&app, "/auth/login", json!({"email": "who@example.com", "password": "pw", "app_id": APP_ID})).await?;
    assert_eq!(wrong_pw, StatusCode::BAD_REQUEST);
    assert_eq!(unknown, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pw_body, unknown_body);

    let (status, body) =
        post(&app, "/auth/login", json!({"email": "bob@example.com", "password": "pw", "app_id": 77})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid app_id");

    let (status, _) = post(&app, "/auth/is_admin", json!({"user_id": 4242})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_internal_errors_hide_detail() -> anyhow::Result<()> {
    let storage = Arc::new(MockStorage::new());
    storage.insert_app(service::auth::domain::App::new(9, "unsigned", ""))?;
    let auth = AuthService::with_storage(Arc::clone(&storage), auth_config());
    let app = routes::build_router(AppState::new(auth), Duration::from_secs(5));

    post(&app, "/auth/register", json!({"email": "carol@example.com", "password": "pw"})).await?;
    let (status, body) =
        post(&app, "/auth/login", json!({"email": "carol@example.com", "password": "pw", "app_id": 9})).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "failed to log in", "code": 1005}));
    Ok(())
}

/// Sleeps before every insert.
struct SlowSaver {
    inner: Arc<MockStorage>,
}

#[async_trait]
impl UserSaver for SlowSaver {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        self.inner.save_user(email, pass_hash).await
    }
}

#[tokio::test]
async fn test_timed_out_registration_still_persists() -> anyhow::Result<()> {
    let storage = Arc::new(MockStorage::new());
    let saver = Arc::new(SlowSaver { inner: Arc::clone(&storage) });
    let auth = AuthService::new(saver, storage.clone(), storage.clone(), auth_config());
    let app = routes::build_router(AppState::new(auth), Duration::from_millis(100));

    let (status, _) = post(&app, "/auth/register", json!({"email": "dave@example.com", "password": "pw"})).await?;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(storage.user_count(), 1);
    Ok(())
}
