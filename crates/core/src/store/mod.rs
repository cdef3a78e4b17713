//! The remote document store the engine synchronizes with.
//!
//! The store holds three collections (`videos`, `categories`, `history`) and
//! offers no atomic multi-document update. Every call is a single-document
//! read or write; the engine builds its transfer protocol on top of that.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Category, HistoryEntry, NewCategory, Video};

/// CRUD calls against the remote store.
///
/// The first group of methods is consumed by the membership engine; the
/// second serves the catalog collaborators (adding/removing videos and
/// categories, watch history).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All categories, in store order.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// A single category. Missing documents yield [`StoreError::NotFound`].
    async fn get_category(&self, id: &str) -> Result<Category, StoreError>;

    /// Replace the whole category document stored under `id`.
    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError>;

    /// A single video. Missing documents yield [`StoreError::NotFound`].
    async fn get_video(&self, id: &str) -> Result<Video, StoreError>;

    /// All videos, in store order.
    async fn list_videos(&self) -> Result<Vec<Video>, StoreError>;

    /// Append a history entry, returning it with its store-assigned id.
    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError>;

    async fn create_video(&self, video: &Video) -> Result<Video, StoreError>;

    async fn delete_video(&self, id: &str) -> Result<(), StoreError>;

    /// Create an empty category, returning it with its store-assigned id.
    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError>;

    async fn delete_category(&self, id: &str) -> Result<(), StoreError>;

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Cheap reachability probe used by health checks.
    async fn ping(&self) -> Result<(), StoreError> {
        self.list_categories().await.map(|_| ())
    }
}
