//! Integration tests for the active-image routes.

mod common;

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{body_json, body_text, TestHarness};
use memoria_core::config::Config;
use memoria_store::DocumentStore;

const PERSONAL_ITEMS: &str = "users/u1/folders/f1/items";

#[tokio::test]
async fn returns_captioned_url_for_current_item() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 1).await;
    h.seed_items(PERSONAL_ITEMS, &["first", "second", "third"]).await;

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let url = body_text(resp).await;
    assert_eq!(
        url,
        "https://res.example.com/upload/co_rgb:000000,e_colorize:40/co_rgb:DDD9D9,\
         l_text:georgia_10_italic_normal_left:second/fl_layer_apply,g_north,x_-30,y_33/v1/1.jpg"
    );
    assert!(h.store.batches().is_empty());
}

#[tokio::test]
async fn unknown_user_is_404_user_not_found() {
    let h = TestHarness::new();
    let resp = h.get("/api/activeUserImage/ghost").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "User not found");
}

#[tokio::test]
async fn user_without_active_folder_is_404() {
    let h = TestHarness::new();
    h.store.put("users/u1", json!({"name": "Ada"})).await.unwrap();
    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "User not found");
}

#[tokio::test]
async fn personal_wrap_past_end_updates_both_cursors() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 5).await;
    h.seed_items(PERSONAL_ITEMS, &["a", "b", "c"]).await;

    let resp = h.get("/api/activeUserItem/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["index"], 0);
    assert_eq!(json["itemCount"], 3);
    assert_eq!(json["category"], "personal");
    assert_eq!(json["folderId"], "f1");
    assert_eq!(json["item"]["id"], "item0");
    assert!(json["imageUrl"].as_str().unwrap().contains("left:a/"));

    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 0);
    assert_eq!(h.doc("users/u1/folders/f1").await["activeFolderItemIdx"], 0);
}

#[tokio::test]
async fn personal_negative_index_wraps_to_last() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", -1).await;
    h.seed_items(PERSONAL_ITEMS, &["a", "b", "c"]).await;

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("left:c/"));

    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 2);
    assert_eq!(h.doc("users/u1/folders/f1").await["activeFolderItemIdx"], 2);
}

#[tokio::test]
async fn community_wrap_updates_user_cursor_only() {
    let h = TestHarness::new();
    h.seed_user("u1", "c9", "community", 10).await;
    h.seed_items("community/c9/items", &["w", "x", "y", "z"]).await;

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("left:w/"));

    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 0);
    let writes = h.store.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "users/u1");
}

#[tokio::test]
async fn empty_folder_is_204() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 3).await;

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(h.store.batches().is_empty());
}

#[tokio::test]
async fn malformed_image_is_422() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.store
        .put(
            &format!("{PERSONAL_ITEMS}/broken"),
            json!({"image": {"secure_url": "https://res.example.com/upload/a.jpg"}, "description": "x"}),
        )
        .await
        .unwrap();

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(resp).await;
    assert_eq!(json["code"], "transform_input_invalid");
}

#[tokio::test]
async fn badly_typed_sibling_does_not_hide_active_item() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.seed_items(PERSONAL_ITEMS, &["good"]).await;
    h.store
        .put(
            &format!("{PERSONAL_ITEMS}/zz"),
            json!({"image": {"secure_url": "https://res.example.com/upload/z.jpg", "height": "200"}, "description": 7}),
        )
        .await
        .unwrap();

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("left:good/"));
}

#[tokio::test]
async fn badly_typed_active_item_is_422() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.store
        .put(
            &format!("{PERSONAL_ITEMS}/bad"),
            json!({"image": {"secure_url": "https://res.example.com/upload/b.jpg", "height": "200"}, "description": "x"}),
        )
        .await
        .unwrap();

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["code"], "transform_input_invalid");
}

#[tokio::test]
async fn handler_errors_carry_request_id() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.store
        .put(
            &format!("{PERSONAL_ITEMS}/bad"),
            json!({"image": {"secure_url": "https://res.example.com/upload/b.jpg"}}),
        )
        .await
        .unwrap();

    let resp = h
        .send(
            Request::get("/api/activeUserItem/u1")
                .header("x-request-id", "req-422")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["request_id"], "req-422");

    let resp = h
        .send(
            Request::post("/api/activeUserImage/u1/cursor")
                .header("content-type", "application/json")
                .header("x-request-id", "req-400")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["request_id"], "req-400");
}

#[tokio::test]
async fn unknown_category_is_404_no_active_item() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "archive", 0).await;
    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "No active item");
}

#[tokio::test]
async fn missing_cursor_is_404_no_active_item() {
    let h = TestHarness::new();
    h.store
        .put(
            "users/u1",
            json!({"activeFolder": {"folderId": "f1", "folderCategory": "personal"}}),
        )
        .await
        .unwrap();
    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "No active item");
}

#[tokio::test]
async fn store_failure_degrades_to_404_not_500() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.seed_items(PERSONAL_ITEMS, &["a"]).await;
    h.store.fail_list(true);

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "No active item");
}

#[tokio::test]
async fn cursor_shift_then_resolve() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    h.seed_items(PERSONAL_ITEMS, &["a", "b", "c"]).await;

    let resp = h
        .post_json("/api/activeUserImage/u1/cursor", json!({"delta": 1}))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 1);
    assert_eq!(h.doc("users/u1/folders/f1").await["activeFolderItemIdx"], 1);

    let resp = h.get("/api/activeUserImage/u1").await;
    assert!(body_text(resp).await.contains("left:b/"));
}

#[tokio::test]
async fn cursor_set_to_wins_over_delta() {
    let h = TestHarness::new();
    h.seed_user("u1", "c1", "community", 0).await;

    let resp = h
        .post_json(
            "/api/activeUserImage/u1/cursor",
            json!({"delta": 1, "setTo": 7}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 7);
}

#[tokio::test]
async fn cursor_without_delta_or_set_to_is_400() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "personal", 0).await;
    let resp = h.post_json("/api/activeUserImage/u1/cursor", json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["code"], "validation_error");
}

#[tokio::test]
async fn cursor_for_missing_folder_document_is_404() {
    let h = TestHarness::new();
    h.store
        .put(
            "users/u1",
            json!({"activeFolder": {"folderId": "gone", "folderCategory": "personal", "activeFolderItemIdx": 2}}),
        )
        .await
        .unwrap();

    let resp = h
        .post_json("/api/activeUserImage/u1/cursor", json!({"setTo": 0}))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.doc("users/u1").await["activeFolder"]["activeFolderItemIdx"], 2);
}

#[tokio::test]
async fn cursor_for_unknown_category_is_422() {
    let h = TestHarness::new();
    h.seed_user("u1", "f1", "archive", 0).await;
    let resp = h
        .post_json("/api/activeUserImage/u1/cursor", json!({"delta": 1}))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["code"], "invalid_reference");
    assert!(h.store.batches().is_empty());
}

#[tokio::test]
async fn cursor_for_unknown_user_is_404() {
    let h = TestHarness::new();
    let resp = h
        .post_json("/api/activeUserImage/ghost/cursor", json!({"delta": 1}))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let h = TestHarness::new();
    let resp = h
        .send(
            Request::get("/api/activeUserImage/ghost")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn health_is_open() {
    let h = TestHarness::new();
    let resp = h.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

fn auth_config() -> Config {
    let mut config = Config::default();
    config.auth.enabled = true;
    config.auth.tokens = HashMap::from([("token-for-user-u1".into(), "u1".into())]);
    config
}

#[tokio::test]
async fn auth_enabled_requires_matching_token() {
    let h = TestHarness::with_config(auth_config());
    h.seed_user("u1", "f1", "personal", 0).await;
    h.seed_items(PERSONAL_ITEMS, &["a"]).await;

    let resp = h.get("/api/activeUserImage/u1").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["code"], "unauthorized");

    let resp = h
        .send(
            Request::get("/api/activeUserImage/u1")
                .header("authorization", "Bearer token-for-user-u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_token_cannot_read_other_user() {
    let h = TestHarness::with_config(auth_config());
    h.seed_user("u2", "f1", "community", 0).await;

    let resp = h
        .send(
            Request::get("/api/activeUserImage/u2")
                .header("authorization", "Bearer token-for-user-u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(h.store.batches().is_empty());
}
