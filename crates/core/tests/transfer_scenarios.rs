//! End-to-end transfer scenarios against an instrumented in-memory store.
//!
//! `RecordingStore` wraps [`MemoryStore`], records every call in order and
//! can be told to fail the next write of a given category document.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use vidshelf_core::error::{CoreError, StoreError, TransferStage};
use vidshelf_core::executor::{TransferExecutor, TransferOutcome};
use vidshelf_core::membership::MembershipModel;
use vidshelf_core::model::{Category, HistoryEntry, NewCategory, Video};
use vidshelf_core::store::{MemoryStore, RemoteStore};
use vidshelf_core::transfer::TransferProtocol;

// ---------------------------------------------------------------------------
// Instrumented store
// ---------------------------------------------------------------------------

struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<String>>,
    fail_update_of: Mutex<Option<String>>,
}

impl RecordingStore {
    fn new(videos: Vec<Video>, categories: Vec<Category>) -> Self {
        Self {
            inner: MemoryStore::with_data(videos, categories),
            calls: Mutex::new(Vec::new()),
            fail_update_of: Mutex::new(None),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("update_category"))
            .collect()
    }

    fn fail_next_update_of(&self, id: &str) {
        *self.fail_update_of.lock().unwrap() = Some(id.to_string());
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.record("list_categories".into());
        self.inner.list_categories().await
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.record(format!("get_category:{id}"));
        self.inner.get_category(id).await
    }

    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError> {
        self.record(format!("update_category:{id}"));
        let should_fail = {
            let mut fail = self.fail_update_of.lock().unwrap();
            if fail.as_deref() == Some(id) {
                fail.take();
                true
            } else {
                false
            }
        };
        if should_fail {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.update_category(id, category).await
    }

    async fn get_video(&self, id: &str) -> Result<Video, StoreError> {
        self.record(format!("get_video:{id}"));
        self.inner.get_video(id).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>, StoreError> {
        self.record("list_videos".into());
        self.inner.list_videos().await
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError> {
        self.record("append_history".into());
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
// Helpers
// ---------------------------------------------------------------------------

fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        img_url: format!("https://img.example/{id}.jpg"),
        video_link: format!("https://www.youtube.com/embed/{id}"),
    }
}

fn category(id: &str, members: &[&str]) -> Category {
    Category {
        id: id.to_string(),
        category_name: id.to_uppercase(),
        all_videos: members.iter().map(|m| video(m)).collect(),
    }
}

struct Harness {
    store: Arc<RecordingStore>,
    membership: Arc<MembershipModel>,
    executor: TransferExecutor,
    protocol: TransferProtocol,
}

async fn harness(videos: &[&str], categories: Vec<Category>) -> Harness {
    let store = Arc::new(RecordingStore::new(
        videos.iter().map(|v| video(v)).collect(),
        categories,
    ));
    let membership = Arc::new(MembershipModel::new(store.clone()));
    membership.load().await.unwrap();
    store.clear_calls();
    let executor = TransferExecutor::new(store.clone(), Arc::clone(&membership));
    Harness {
        store,
        membership,
        executor,
        protocol: TransferProtocol::default(),
    }
}

async fn member_ids(store: &RecordingStore, category_id: &str) -> Vec<String> {
    store
        .inner
        .get_category(category_id)
        .await
        .unwrap()
        .all_videos
        .into_iter()
        .map(|v| v.id)
        .collect()
}

async fn pool_ids(h: &Harness) -> Vec<String> {
    let all = h.store.inner.list_videos().await.unwrap();
    h.membership
        .unassigned(&all)
        .into_iter()
        .map(|v| v.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pool_to_empty_category() {
    let h = harness(&["v1"], vec![category("c1", &[])]).await;
    assert_eq!(pool_ids(&h).await, ["v1"]);

    let payload = h.protocol.begin_drag("v1", None);
    let intent = h.protocol.complete_drag(&payload, Some("c1")).unwrap();
    let report = h.executor.execute(intent).await.unwrap();

    assert_eq!(report.outcome, TransferOutcome::Applied);
    assert_eq!(member_ids(&h.store, "c1").await, ["v1"]);
    assert!(pool_ids(&h).await.is_empty());
    assert_eq!(report.snapshot.categories()[0].all_videos, vec![video("v1")]);
}

#[tokio::test]
async fn category_to_category() {
    let h = harness(&["v1"], vec![category("c1", &["v1"]), category("c2", &[])]).await;

    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c2")).unwrap();
    h.executor.execute(intent).await.unwrap();

    assert!(member_ids(&h.store, "c1").await.is_empty());
    assert_eq!(member_ids(&h.store, "c2").await, ["v1"]);
    assert!(h.membership.snapshot().duplicate_memberships().is_empty());
}

#[tokio::test]
async fn same_category_drop_makes_no_store_calls() {
    let h = harness(&["v1"], vec![category("c1", &["v1"])]).await;
    let before = h.membership.snapshot();

    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c1")).unwrap();
    let report = h.executor.execute(intent).await.unwrap();

    assert_eq!(report.outcome, TransferOutcome::NoOp);
    assert!(h.store.calls().is_empty());
    assert_eq!(*report.snapshot, *before);
    assert_eq!(member_ids(&h.store, "c1").await, ["v1"]);
}

#[tokio::test]
async fn target_deleted_before_fetch_fails_at_target_fetch() {
    let h = harness(&["v1"], vec![category("c1", &["v1"]), category("c2", &[])]).await;

    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c2")).unwrap();
    h.store.inner.delete_category("c2").await.unwrap();

    let err = h.executor.execute(intent).await.unwrap_err();
    assert_matches!(
        err,
        CoreError::TransferFailed {
            stage: TransferStage::TargetFetch,
            cause: StoreError::NotFound { entity: "Category", .. },
        }
    );
    assert_eq!(member_ids(&h.store, "c1").await, ["v1"]);
    assert!(h.store.writes().is_empty());
}

#[tokio::test]
async fn source_update_failure_leaves_video_in_both() {
    let h = harness(&["v1"], vec![category("c1", &["v1"]), category("c2", &[])]).await;
    h.store.fail_next_update_of("c1");

    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c2")).unwrap();
    let err = h.executor.execute(intent).await.unwrap_err();

    assert_matches!(
        err,
        CoreError::TransferFailed {
            stage: TransferStage::SourceUpdate,
            ..
        }
    );
    assert_eq!(member_ids(&h.store, "c1").await, ["v1"]);
    assert_eq!(member_ids(&h.store, "c2").await, ["v1"]);
}

#[tokio::test]
async fn retry_after_partial_failure_completes_the_move() {
    let h = harness(&["v1"], vec![category("c1", &["v1"]), category("c2", &[])]).await;
    h.store.fail_next_update_of("c1");

    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c2")).unwrap();
    assert!(h.executor.execute(intent.clone()).await.is_err());

    let report = h.executor.execute(intent).await.unwrap();
    assert_eq!(report.outcome, TransferOutcome::AlreadyPresent);
    assert!(member_ids(&h.store, "c1").await.is_empty());
    assert_eq!(member_ids(&h.store, "c2").await, ["v1"]);
    assert!(report.snapshot.duplicate_memberships().is_empty());
}

#[tokio::test]
async fn repeated_transfer_appends_once() {
    let h = harness(&["v1"], vec![category("c1", &[])]).await;
    let payload = h.protocol.begin_drag("v1", None);
    let intent = h.protocol.complete_drag(&payload, Some("c1")).unwrap();

    h.executor.execute(intent.clone()).await.unwrap();
    let second = h.executor.execute(intent).await.unwrap();

    assert_eq!(second.outcome, TransferOutcome::AlreadyPresent);
    assert_eq!(member_ids(&h.store, "c1").await, ["v1"]);
}

#[tokio::test]
async fn target_is_written_before_source() {
    let h = harness(&["v1"], vec![category("c1", &["v1"]), category("c2", &[])]).await;
    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, Some("c2")).unwrap();
    h.executor.execute(intent).await.unwrap();

    assert_eq!(
        h.store.calls(),
        [
            "get_video:v1",
            "get_category:c2",
            "update_category:c2",
            "get_category:c1",
            "update_category:c1",
            "list_categories",
        ]
    );
}

#[tokio::test]
async fn vanished_video_fails_at_video_fetch() {
    let h = harness(&["v1"], vec![category("c1", &[])]).await;
    h.store.inner.delete_video("v1").await.unwrap();

    let payload = h.protocol.begin_drag("v1", None);
    let intent = h.protocol.complete_drag(&payload, Some("c1")).unwrap();
    let err = h.executor.execute(intent).await.unwrap_err();

    assert_matches!(
        err,
        CoreError::TransferFailed {
            stage: TransferStage::VideoFetch,
            cause: StoreError::NotFound { entity: "Video", .. },
        }
    );
    assert!(h.store.writes().is_empty());
}

#[tokio::test]
async fn category_to_pool_returns_video_to_pool() {
    let h = harness(&["v1", "v2"], vec![category("c1", &["v1", "v2"])]).await;
    let payload = h.protocol.begin_drag("v1", Some("c1"));
    let intent = h.protocol.complete_drag(&payload, None).unwrap();
    h.executor.execute(intent).await.unwrap();

    assert_eq!(member_ids(&h.store, "c1").await, ["v2"]);
    assert_eq!(pool_ids(&h).await, ["v1"]);
    assert_eq!(h.store.writes(), ["update_category:c1"]);
}

#[tokio::test]
async fn membership_stays_exclusive_across_a_sequence() {
    let h = harness(
        &["a", "b", "c"],
        vec![category("c1", &[]), category("c2", &[]), category("c3", &[])],
    )
    .await;

    let moves: [(&str, Option<&str>, Option<&str>); 7] = [
        ("a", None, Some("c1")),
        ("b", None, Some("c1")),
        ("a", Some("c1"), Some("c2")),
        ("c", None, Some("c3")),
        ("b", Some("c1"), Some("c3")),
        ("a", Some("c2"), None),
        ("c", Some("c3"), Some("c1")),
    ];

    for (video_id, from, to) in moves {
        let payload = h.protocol.begin_drag(video_id, from);
        let intent = h.protocol.complete_drag(&payload, to).unwrap();
        let report = h.executor.execute(intent).await.unwrap();
        assert!(report.snapshot.duplicate_memberships().is_empty());
    }

    assert_eq!(pool_ids(&h).await, ["a"]);
    assert_eq!(member_ids(&h.store, "c1").await, ["c"]);
    assert!(member_ids(&h.store, "c2").await.is_empty());
    assert_eq!(member_ids(&h.store, "c3").await, ["b"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn category_queue_prevents_lost_updates() {
    let ids: Vec<String> = (0..16).map(|i| format!("v{i}")).collect();
    let store = Arc::new(MemoryStore::with_data(
        ids.iter().map(|id| video(id)).collect(),
        vec![category("c1", &[])],
    ));
    let membership = Arc::new(MembershipModel::new(store.clone()));
    let executor = Arc::new(
        TransferExecutor::new(store.clone(), Arc::clone(&membership)).with_category_queue(),
    );
    let protocol = TransferProtocol::default();

    let mut handles = Vec::new();
    for id in &ids {
        let intent = protocol
            .complete_drag(&protocol.begin_drag(id, None), Some("c1"))
            .unwrap();
        let executor = Arc::clone(&executor);
        handles.push(tokio::spawn(async move { executor.execute(intent).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let members = store.get_category("c1").await.unwrap().all_videos;
    assert_eq!(members.len(), ids.len());
}
