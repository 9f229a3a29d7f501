//! Learning activity integration tests.

mod common;

use axum::http::StatusCode;
use common::{authed, TestHarness};

#[tokio::test]
async fn completing_an_activity_credits_points_only() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    let response = authed(harness.server.post("/v1/activities/1/complete"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"]["completed"]["reward_points"], 10);
    assert_eq!(body["student"]["points"], 10);
    assert_eq!(body["student"]["xp"], 0);
}

#[tokio::test]
async fn completing_twice_is_informational() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    authed(harness.server.post("/v1/activities/2/complete"), &ana)
        .await
        .assert_status_ok();
    let response = authed(harness.server.post("/v1/activities/2/complete"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["outcome"], "already_completed");
    assert_eq!(body["student"]["points"], 10);
    assert_eq!(harness.points(&ana.id), 10);
}

#[tokio::test]
async fn unknown_activity_is_404() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    let response = authed(harness.server.post("/v1/activities/999/complete"), &ana).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "activity not found: 999");
    assert_eq!(harness.points(&ana.id), 0);
}

#[tokio::test]
async fn catalog_and_history_reflect_completions() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    authed(harness.server.post("/v1/activities/3/complete"), &ana)
        .await
        .assert_status_ok();
    authed(harness.server.post("/v1/activities/1/complete"), &ana)
        .await
        .assert_status_ok();

    let catalog: serde_json::Value = authed(harness.server.get("/v1/activities"), &ana).await.json();
    let completed: Vec<_> = catalog
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["completed"] == true)
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(completed, vec![1, 3]);

    let history: serde_json::Value =
        authed(harness.server.get("/v1/activities/history"), &ana).await.json();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Newest first.
    assert_eq!(history[0]["activity_id"], 1);
    assert_eq!(history[1]["activity_id"], 3);
    assert_eq!(history[1]["name"], "Asistencia a Webinar");
}
