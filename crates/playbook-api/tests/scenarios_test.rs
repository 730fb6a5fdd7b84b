//! Integration tests for the scenario endpoints.

mod common;

use axum::http::StatusCode;
use playbook_test_support::fixtures::{linear_scenario, phishing_scenario};
use uuid::Uuid;

#[tokio::test]
async fn test_list_scenarios_returns_all_stored_ones() {
    let app = common::build_test_app();
    common::seed_scenario(&app, &linear_scenario()).await;
    common::seed_scenario(&app, &phishing_scenario()).await;

    let (status, json) = common::get_json(&app, "/api/v1/scenarios").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|scenario| scenario["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Walkthrough"));
    assert!(titles.contains(&"Going Phishing"));
}

#[tokio::test]
async fn test_get_scenario_exposes_variables_and_story_summaries() {
    let app = common::build_test_app();
    let scenario_id = common::seed_scenario(&app, &phishing_scenario()).await;

    let (status, json) =
        common::get_json(&app, &format!("/api/v1/scenarios/{scenario_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Going Phishing");
    // Variables are name-sorted in the view.
    let names: Vec<&str> = json["variables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|variable| variable["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Attacker Inside", "Budget", "Financial Loss"]);
    assert_eq!(json["stories"][0]["title"], "Initial Access");
    assert_eq!(json["stories"][0]["entry_node"], "suspicious-email");
    assert_eq!(json["stories"][1]["title"], "Debrief");
}

#[tokio::test]
async fn test_get_unknown_scenario_returns_404() {
    let app = common::build_test_app();

    let (status, json) =
        common::get_json(&app, &format!("/api/v1/scenarios/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}
