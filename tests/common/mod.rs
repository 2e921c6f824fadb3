// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use petid_api::config::Config;
use petid_api::db::{Database, FirestoreDb, MemoryDb};
use petid_api::routes::create_router;
use petid_api::services::Argon2Config;
use petid_api::AppState;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Config with a private upload directory under the system temp dir.
#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        upload_dir: std::env::temp_dir()
            .join(format!("petid-test-{}", uuid::Uuid::new_v4().simple())),
        ..Config::test_default()
    }
}

/// Create a test app backed by the in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(test_config(), Database::Memory(MemoryDb::new()))
}

/// Create a test app whose database is offline; every query fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(test_config(), Database::Firestore(FirestoreDb::new_mock()))
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config, db: Database) -> (Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::new(config, db, Argon2Config::testing()).expect("Failed to build test state"),
    );
    (create_router(state.clone()), state)
}

/// Bearer token for `user_id` signed with the app's key.
#[allow(dead_code)]
pub fn token_for(state: &AppState, user_id: &str) -> String {
    state
        .credentials
        .issue_token(user_id)
        .expect("Failed to create JWT")
}

/// Send a request through a clone of the router.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// JSON request, optionally authenticated.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Bodiless request, optionally authenticated.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
