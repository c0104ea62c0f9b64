use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use std::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

use calendar_service::ServiceError;
use calendar_service::db::Database;
use calendar_service::router::{CalendarState, calendar_router};

/// Serializes tests that mutate the process environment.
fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn set_db_env(user: &str, password: &str, host: &str, name: &str) {
    unsafe {
        std::env::set_var("DB_USER", user);
        std::env::set_var("DB_PASSWORD", password);
        std::env::set_var("DB_HOST", host);
        std::env::set_var("DB_NAME", name);
    }
}

fn clear_db_env() {
    unsafe {
        std::env::remove_var("DB_USER");
        std::env::remove_var("DB_PASSWORD");
        std::env::remove_var("DB_HOST");
        std::env::remove_var("DB_NAME");
    }
}

#[tokio::test]
async fn request_is_rejected_when_database_is_unreachable() {
    let _guard = env_lock();
    // Port 1 on loopback: nothing listens there, so the reconnect attempt
    // fails and the handler must never run.
    set_db_env("u", "p", "127.0.0.1:1", "cal");

    let app = calendar_router(CalendarState::new(Database::new()));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert_eq!(&body[..], b"Database connection error");
}

#[tokio::test]
async fn failed_establish_does_not_install_a_handle() {
    let _guard = env_lock();
    set_db_env("u", "p", "127.0.0.1:1", "cal");

    let db = Database::new();
    let err = db.establish().await.expect_err("establish should fail");
    assert!(matches!(err, ServiceError::Connect(_)), "got {err:?}");

    // Nothing was replaced, so the manager still reports no connection.
    let err = db.probe().await.expect_err("probe should fail");
    assert!(matches!(err, ServiceError::Unconnected), "got {err:?}");
}

#[tokio::test]
async fn establish_reports_missing_configuration() {
    let _guard = env_lock();
    clear_db_env();

    let db = Database::new();
    let err = db.establish().await.expect_err("establish should fail");
    assert!(matches!(err, ServiceError::Config(_)), "got {err:?}");
}

#[tokio::test]
async fn teardown_without_handle_is_a_noop() {
    let db = Database::new();
    db.teardown().await;
    // A second call finds the slot already empty and stays a no-op.
    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires a reachable MySQL configured via DB_USER/DB_PASSWORD/DB_HOST/DB_NAME"]
async fn hello_route_serves_greeting_with_live_database() {
    let _guard = env_lock();

    let db = Database::new();
    db.establish().await.expect("failed to connect to test database");

    let app = calendar_router(CalendarState::new(db.clone()));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    assert_eq!(&body[..], b"Hello, Calendar!");

    db.teardown().await;
}
