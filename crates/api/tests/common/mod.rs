#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use tabula_api::auth::password::{Argon2Hasher, HashCost};
use tabula_api::config::{Environment, ServerConfig};
use tabula_api::router::build_app_router;
use tabula_api::state::AppState;
use tabula_core::clock::{Clock, ManualClock};
use tabula_core::types::Timestamp;

pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../db/migrations");

/// Pepper used by every test app; digests made elsewhere must use it too.
pub const TEST_PEPPER: &str = "test-pepper";

/// Default password for users made with [`TestApp::register`].
pub const PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(migrations_dir: impl Into<PathBuf>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        migrations_dir: migrations_dir.into(),
        migrate_on_startup: false,
        password_pepper: TEST_PEPPER.to_string(),
        environment: Environment::Development,
    }
}

/// A fixed start instant with whole seconds, so round trips through
/// `timestamptz` (microsecond precision) compare equal.
pub fn start_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

/// The full router plus handles the tests need to steer it.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub clock: Arc<ManualClock>,
}

/// Build the app over `pool` with the schema already installed.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    let app = build_test_app_with_migrations(pool, MIGRATIONS_DIR);
    app.migrate().await;
    app
}

/// Build the app over `pool` without touching the schema.
pub fn build_test_app_with_migrations(pool: PgPool, dir: impl Into<PathBuf>) -> TestApp {
    let clock = Arc::new(ManualClock::new(start_time()));
    let hasher = Arc::new(Argon2Hasher::new(TEST_PEPPER, HashCost::Minimal));
    let state = AppState::new(pool.clone(), test_config(dir), clock.clone(), hasher);

    TestApp {
        router: build_app_router(state),
        pool,
        clock,
    }
}

impl TestApp {
    /// Install the schema through the migration runner.
    pub async fn migrate(&self) {
        let mut conn = self.pool.acquire().await.unwrap();
        tabula_db::migrate::MigrationRunner::new(MIGRATIONS_DIR)
            .apply(&mut conn, self.clock.as_ref())
            .await
            .unwrap();
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
        session: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header(COOKIE, format!("session_id={token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn patch_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.request(Method::PATCH, uri, Some(body), None).await
    }

    /// Register `username` with `<username>@example.com` and [`PASSWORD`].
    pub async fn register(&self, username: &str) -> serde_json::Value {
        let response = self
            .post_json(
                "/api/v1/users",
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status(), 201, "registration of {username} failed");
        body_json(response).await
    }

    /// Log in as a user made with [`TestApp::register`]; returns the token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/sessions",
                serde_json::json!({
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status(), 201, "login of {username} failed");
        let json = body_json(response).await;
        json["token"].as_str().unwrap().to_string()
    }
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The single `Set-Cookie` header of the response.
pub fn set_cookie(response: &Response<Body>) -> String {
    let mut values = response.headers().get_all(SET_COOKIE).iter();
    let value = values.next().expect("response should set a cookie");
    assert!(values.next().is_none(), "expected exactly one Set-Cookie");
    value.to_str().unwrap().to_string()
}

/// Parse an RFC 3339 timestamp from a JSON field.
pub fn timestamp(value: &serde_json::Value) -> Timestamp {
    value
        .as_str()
        .unwrap()
        .parse::<Timestamp>()
        .unwrap()
}
