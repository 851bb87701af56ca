//! HTTP-level integration tests for the `/migrations` endpoint.
//!
//! These start from an empty database: the app is built without
//! installing the schema.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app_with_migrations, timestamp, MIGRATIONS_DIR};
use sqlx::PgPool;

async fn table_exists(pool: &PgPool, table: &str) -> bool {
    sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(table)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Listing pending migrations is read-only and stable across calls.
#[sqlx::test(migrations = false)]
async fn test_list_pending_is_read_only(pool: PgPool) {
    let app = build_test_app_with_migrations(pool, MIGRATIONS_DIR);

    let first = app.get("/api/v1/migrations").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;

    let second = body_json(app.get("/api/v1/migrations").await).await;
    assert_eq!(first, second);

    let pending = first.as_array().unwrap();
    assert!(!pending.is_empty());
    let names: Vec<&str> = pending.iter().map(|m| m["name"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(pending[0]["path"].as_str().unwrap().ends_with(".sql"));
    assert!(pending[0]["timestamp"].is_i64());

    assert!(!table_exists(&app.pool, "pgmigrations").await);
    assert!(!table_exists(&app.pool, "users").await);
}

/// The first POST applies everything (201); the second has nothing to do (200).
#[sqlx::test(migrations = false)]
async fn test_apply_twice(pool: PgPool) {
    let app = build_test_app_with_migrations(pool, MIGRATIONS_DIR);
    let pending = body_json(app.get("/api/v1/migrations").await).await;

    let first = app.request(Method::POST, "/api/v1/migrations", None, None).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let applied = body_json(first).await;
    let applied = applied.as_array().unwrap();
    assert_eq!(applied.len(), pending.as_array().unwrap().len());
    for (done, expected) in applied.iter().zip(pending.as_array().unwrap()) {
        assert_eq!(done["name"], expected["name"]);
        assert_eq!(timestamp(&done["run_on"]), app.now());
    }

    let second = app.request(Method::POST, "/api/v1/migrations", None, None).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await, serde_json::json!([]));

    let after = body_json(app.get("/api/v1/migrations").await).await;
    assert_eq!(after, serde_json::json!([]));
    assert!(table_exists(&app.pool, "users").await);
}

/// A failing file is reported as an internal error, leaves no ledger row,
/// and stays pending.
#[sqlx::test(migrations = false)]
async fn test_failed_migration_stays_pending(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("1_create-widgets.sql"),
        "CREATE TABLE widgets (id SERIAL PRIMARY KEY);",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("2_broken.sql"),
        "CREATE TABLE gadgets (id SERIAL PRIMARY KEY); SELECT * FROM missing_table;",
    )
    .unwrap();
    let app = build_test_app_with_migrations(pool, dir.path());

    let response = app.request(Method::POST, "/api/v1/migrations", None, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["name"], "InternalServerError");
    assert!(!json["message"].as_str().unwrap().contains("missing_table"));

    assert!(table_exists(&app.pool, "widgets").await);
    assert!(!table_exists(&app.pool, "gadgets").await);

    let pending = body_json(app.get("/api/v1/migrations").await).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["name"], "2_broken");
}

/// Unsupported methods answer 405 with the standard error body.
#[sqlx::test(migrations = false)]
async fn test_migrations_method_not_allowed(pool: PgPool) {
    let app = build_test_app_with_migrations(pool, MIGRATIONS_DIR);

    for method in [Method::PUT, Method::DELETE, Method::PATCH] {
        let response = app.request(method, "/api/v1/migrations", None, None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "name": "MethodNotAllowedError",
                "message": "Method not allowed for this endpoint.",
                "action": "Check that the HTTP method is valid for this endpoint.",
                "status_code": 405,
            })
        );
    }
}
