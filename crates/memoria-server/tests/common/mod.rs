//! Shared test harness for integration tests.
//!
//! [`TestHarness`] builds an [`AppContext`] over a fresh in-memory store
//! wrapped in a [`RecordingStore`], and drives the router in-process with
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use memoria_core::config::Config;
use memoria_server::context::AppContext;
use memoria_server::router::build_router;
use memoria_store::recording::RecordingStore;
use memoria_store::{DocumentStore, SqliteStore};

pub struct TestHarness {
    pub ctx: AppContext,
    pub store: Arc<RecordingStore<SqliteStore>>,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let store = RecordingStore::new(SqliteStore::in_memory().expect("in-memory store"));
        let ctx = AppContext::new(store.clone(), config);
        Self { ctx, store }
    }

    /// Seed a user whose active folder is `folder_id`, plus the personal
    /// folder document when `category` is `personal`.
    pub async fn seed_user(&self, user_id: &str, folder_id: &str, category: &str, idx: i64) {
        self.store
            .put(
                &format!("users/{user_id}"),
                json!({
                    "activeFolder": {
                        "folderId": folder_id,
                        "folderCategory": category,
                        "activeFolderItemIdx": idx
                    }
                }),
            )
            .await
            .expect("seed user");
        if category == "personal" {
            self.store
                .put(
                    &format!("users/{user_id}/folders/{folder_id}"),
                    json!({ "activeFolderItemIdx": idx }),
                )
                .await
                .expect("seed folder");
        }
    }

    /// Seed `descriptions.len()` items into a folder, 200px tall each.
    pub async fn seed_items(&self, collection: &str, descriptions: &[&str]) {
        for (i, description) in descriptions.iter().enumerate() {
            self.store
                .put(
                    &format!("{collection}/item{i}"),
                    json!({
                        "image": {
                            "secure_url": format!("https://res.example.com/upload/v1/{i}.jpg"),
                            "height": 200
                        },
                        "description": description
                    }),
                )
                .await
                .expect("seed item");
        }
    }

    pub async fn doc(&self, path: &str) -> Value {
        self.store
            .get(path)
            .await
            .expect("store read")
            .unwrap_or(Value::Null)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        build_router(self.ctx.clone())
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}
