//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use playbook_scenario::application::scenario_repository::save_scenario;
use playbook_scenario::domain::scenarios::Scenario;
use playbook_test_support::{FixedClock, InMemorySnapshotRepository};
use tower::ServiceExt;
use uuid::Uuid;

use playbook_api::routes;
use playbook_api::state::AppState;

/// A full app router over an in-memory snapshot store with a fixed clock.
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemorySnapshotRepository>,
    pub clock: FixedClock,
}

/// Build the test app with the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let clock = FixedClock::default();
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let app_state = AppState::new(Arc::new(clock), repository.clone());

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/scenarios", routes::scenarios::router())
        .nest("/api/v1/games", routes::games::router())
        .with_state(app_state);

    TestApp {
        router,
        repository,
        clock,
    }
}

/// Store a scenario so games can be created from it.
pub async fn seed_scenario(app: &TestApp, scenario: &Scenario) -> Uuid {
    save_scenario(app.repository.as_ref(), &app.clock, scenario)
        .await
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete_json(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
