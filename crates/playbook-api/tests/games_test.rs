//! Integration tests for single-player game play.

mod common;

use axum::http::StatusCode;
use playbook_test_support::fixtures::phishing_scenario;
use serde_json::json;
use uuid::Uuid;

use common::{build_test_app, get_json, post_json, seed_scenario};

async fn created_game(app: &common::TestApp) -> String {
    let scenario_id = seed_scenario(app, &phishing_scenario()).await;
    let (status, json) = post_json(
        app,
        "/api/v1/games",
        &json!({ "scenario_id": scenario_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["game_id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_created_game_is_open_with_no_cursor() {
    let app = build_test_app();
    let game_id = created_game(&app).await;

    let (status, json) = get_json(&app, &format!("/api/v1/games/{game_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "open");
    assert_eq!(json["is_group"], false);
    assert!(json["current_inject"].is_null());
    assert_eq!(json["scenario_title"], "Going Phishing");
}

#[tokio::test]
async fn test_create_with_unknown_scenario_returns_404() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/games",
        &json!({ "scenario_id": Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_start_moves_cursor_to_first_entry_node() {
    let app = build_test_app();
    let game_id = created_game(&app).await;

    let (status, json) = post_json(&app, &format!("/api/v1/games/{game_id}/start"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "in_progress");
    assert_eq!(json["current_inject"], "suspicious-email");

    let (status, inject) = get_json(&app, &format!("/api/v1/games/{game_id}/inject")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inject["slug"], "suspicious-email");
    assert_eq!(
        inject["choices"],
        json!(["Pay the invoice", "Escalate to security"])
    );
}

#[tokio::test]
async fn test_solve_before_start_returns_409() {
    let app = build_test_app();
    let game_id = created_game(&app).await;

    let (status, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "suspicious-email", "solution": { "index": 0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");
}

#[tokio::test]
async fn test_full_walkthrough_to_finished() {
    let app = build_test_app();
    let game_id = created_game(&app).await;
    post_json(&app, &format!("/api/v1/games/{game_id}/start"), &json!({})).await;

    // Paying the invoice costs 2500 and moves on to containment.
    let (status, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "suspicious-email", "solution": { "index": 0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_inject"], "containment");

    let (_, variables) = get_json(&app, &format!("/api/v1/games/{game_id}/variables")).await;
    assert_eq!(
        variables,
        json!([
            { "name": "Budget", "datatype": "number", "value": 10000.0 },
            { "name": "Financial Loss", "datatype": "number", "value": 2500.0 }
        ])
    );

    // Two informative beats exhaust the first story.
    let (_, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "containment", "solution": { "index": 0 } }),
    )
    .await;
    assert_eq!(json["current_inject"], "all-clear");
    let (_, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "all-clear", "solution": { "index": 0 } }),
    )
    .await;
    assert_eq!(json["current_inject"], "lessons-learned");

    // The wrap-up guard sees the financial loss and redirects.
    let (_, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "lessons-learned", "solution": { "index": 0 } }),
    )
    .await;
    assert_eq!(json["current_inject"], "budget-review");

    let (_, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "budget-review", "solution": { "index": 0 } }),
    )
    .await;
    assert_eq!(json["state"], "finished");
    assert_eq!(json["history_length"], 5);
    assert!(json["end_time"].is_string());

    let (status, _) = get_json(&app, &format!("/api/v1/games/{game_id}/inject")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_out_of_range_choice_returns_400() {
    let app = build_test_app();
    let game_id = created_game(&app).await;
    post_json(&app, &format!("/api/v1/games/{game_id}/start"), &json!({})).await;

    let (status, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "suspicious-email", "solution": { "index": 7 } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "choice_out_of_range");
}

#[tokio::test]
async fn test_unknown_inject_slug_returns_422() {
    let app = build_test_app();
    let game_id = created_game(&app).await;
    post_json(&app, &format!("/api/v1/games/{game_id}/start"), &json!({})).await;

    let (status, json) = post_json(
        &app,
        &format!("/api/v1/games/{game_id}/solve"),
        &json!({ "inject_slug": "nowhere", "solution": { "index": 0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "unknown_inject");
}

#[tokio::test]
async fn test_unknown_game_returns_404() {
    let app = build_test_app();

    let (status, json) = get_json(&app, &format!("/api/v1/games/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_abort_is_idempotent_over_http() {
    let app = build_test_app();
    let game_id = created_game(&app).await;
    post_json(&app, &format!("/api/v1/games/{game_id}/start"), &json!({})).await;

    let (status, first) =
        post_json(&app, &format!("/api/v1/games/{game_id}/abort"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["state"], "aborted");

    let (status, second) =
        post_json(&app, &format!("/api/v1/games/{game_id}/abort"), &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["end_time"], first["end_time"]);
}
