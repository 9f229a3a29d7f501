//! Shop and inventory integration tests.

mod common;

use axum::http::StatusCode;
use common::{authed, TestHarness};

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn shop_lists_catalog_with_owned_flags() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    let response = authed(harness.server.get("/v1/shop"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["points"], 0);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|i| i["owned"] == false));
    assert_eq!(items[2]["category"], "frame");
    assert_eq!(items[2]["price"], 100);
}

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn purchase_without_points_is_402() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 30);

    let response = authed(harness.server.post("/v1/shop/items/1/purchase"), &ana).await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_points");
    assert_eq!(body["error"]["details"]["balance"], 30);
    assert_eq!(body["error"]["details"]["required"], 50);
    assert_eq!(harness.points(&ana.id), 30);
}

#[tokio::test]
async fn purchasing_a_frame_pays_out_shop_missions() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 200);

    let response = authed(harness.server.post("/v1/shop/items/3/purchase"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // 200 - 100 + 20 (buy a frame) + 50 (spend 100 points)
    assert_eq!(body["student"]["points"], 170);
    assert_eq!(body["student"]["xp"], 35);
    assert_eq!(body["student"]["level"], 1);

    let kinds: Vec<_> = body["notices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds.iter().filter(|k| *k == "mission_completed").count(), 2);
    assert!(kinds.iter().any(|k| k == "achievement_unlocked"));

    let shop: serde_json::Value = authed(harness.server.get("/v1/shop"), &ana).await.json();
    assert_eq!(shop["items"][2]["owned"], true);
}

#[tokio::test]
async fn buying_an_owned_item_fails_without_debit() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 500);

    authed(harness.server.post("/v1/shop/items/1/purchase"), &ana)
        .await
        .assert_status_ok();
    let after_first = harness.points(&ana.id);

    let response = authed(harness.server.post("/v1/shop/items/1/purchase"), &ana).await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(harness.points(&ana.id), after_first);
}

#[tokio::test]
async fn unknown_or_malformed_item_ids() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    let response = authed(harness.server.post("/v1/shop/items/99/purchase"), &ana).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "item not found: 99");

    authed(harness.server.post("/v1/shop/items/abc/purchase"), &ana)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Equip
// ============================================================================

#[tokio::test]
async fn equipping_an_unowned_item_leaves_cosmetics_unchanged() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;

    let response = authed(harness.server.post("/v1/inventory/frame/3/equip"), &ana).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let dashboard: serde_json::Value = authed(harness.server.get("/v1/dashboard"), &ana).await.json();
    assert_eq!(dashboard["student"]["frame"], "marco-1.png");
}

#[tokio::test]
async fn equip_owned_frame_and_list_inventory() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 200);
    authed(harness.server.post("/v1/shop/items/3/purchase"), &ana)
        .await
        .assert_status_ok();

    let response = authed(harness.server.post("/v1/inventory/marco/3/equip"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["student"]["frame"], "marco-2.png");

    let inventory: serde_json::Value = authed(harness.server.get("/v1/inventory"), &ana).await.json();
    let items = inventory.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 3);
    assert_eq!(items[0]["equipped"], true);
}

#[tokio::test]
async fn equip_into_wrong_slot_is_rejected() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 200);
    authed(harness.server.post("/v1/shop/items/3/purchase"), &ana)
        .await
        .assert_status_ok();

    authed(harness.server.post("/v1/inventory/avatar/3/equip"), &ana)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    authed(harness.server.post("/v1/inventory/hat/3/equip"), &ana)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn equipping_an_avatar_fires_avatar_mission() {
    let harness = TestHarness::new();
    let ana = harness.student("ana").await;
    harness.set_points(&ana.id, 50);
    authed(harness.server.post("/v1/shop/items/1/purchase"), &ana)
        .await
        .assert_status_ok();
    let before = harness.points(&ana.id);

    let response = authed(harness.server.post("/v1/inventory/avatar/1/equip"), &ana).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["student"]["avatar"], "avatar-2.png");
    assert_eq!(body["student"]["points"], before + 15);
}
