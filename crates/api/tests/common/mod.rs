#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vidshelf_api::config::{ServerConfig, StoreBackend};
use vidshelf_api::router::build_app_router;
use vidshelf_api::state::AppState;
use vidshelf_core::error::StoreError;
use vidshelf_core::model::{Category, HistoryEntry, NewCategory, Video};
use vidshelf_core::store::{MemoryStore, RemoteStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store: StoreBackend::Memory,
        pool_drop_target: true,
        serialize_transfers: true,
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack production uses.
pub fn build_test_app(store: Arc<dyn RemoteStore>) -> Router {
    build_test_app_with(store, test_config())
}

pub fn build_test_app_with(store: Arc<dyn RemoteStore>, config: ServerConfig) -> Router {
    build_app_router(AppState::new(store, config))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        img_url: format!("https://img.example/{id}.jpg"),
        video_link: format!("https://www.youtube.com/embed/{id}"),
    }
}

pub fn category(id: &str, name: &str, members: &[&str]) -> Category {
    Category {
        id: id.to_string(),
        category_name: name.to_string(),
        all_videos: members.iter().map(|m| video(m)).collect(),
    }
}

/// Videos `v1`..`v3`; category `c1` holds `v1`, `c2` is empty.
pub fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_data(
        vec![video("v1"), video("v2"), video("v3")],
        vec![category("c1", "Music", &["v1"]), category("c2", "Talks", &[])],
    ))
}

/// Member ids of each category in a `{data: [CategoryView]}` body, keyed by
/// category id.
pub fn members(json: &serde_json::Value, category_id: &str) -> Vec<String> {
    json.as_array()
        .into_iter()
        .flatten()
        .find(|c| c["id"] == category_id)
        .map(|c| {
            c["videos"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|v| v["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Flaky store
// ---------------------------------------------------------------------------

/// [`MemoryStore`] whose `update_category` fails for selected ids until
/// [`FlakyStore::heal`] is called.
pub struct FlakyStore {
    inner: MemoryStore,
    failing_updates: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing_updates: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_updates_of(&self, category_id: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .insert(category_id.to_string());
    }

    pub fn heal(&self) {
        self.failing_updates.lock().unwrap().clear();
    }
}

#[async_trait]
impl RemoteStore for FlakyStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.inner.list_categories().await
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.inner.get_category(id).await
    }

    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError> {
        if self.failing_updates.lock().unwrap().contains(id) {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.update_category(id, category).await
    }

    async fn get_video(&self, id: &str) -> Result<Video, StoreError> {
        self.inner.get_video(id).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, StoreError> {
        self.inner.list_videos().await
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError> {
        self.inner.append_history(entry).await
    }

    async fn create_video(&self, video: &Video) -> Result<Video, StoreError> {
        self.inner.create_video(video).await
    }

    async fn delete_video(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete_video(id).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        self.inner.create_category(category).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        self.inner.delete_category(id).await
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.inner.list_history().await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}
