use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{Category, HistoryEntry, NewCategory, Video};
use crate::store::RemoteStore;

#[derive(Default)]
struct Collections {
    videos: Vec<Video>,
    categories: Vec<Category>,
    history: Vec<HistoryEntry>,
}

/// Process-local [`RemoteStore`].
///
/// Behaves like the document server: whole-document reads and writes,
/// store-assigned ids for new categories and history entries, no
/// multi-document atomicity. Used for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing collections.
    pub fn with_data(videos: Vec<Video>, categories: Vec<Category>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                videos,
                categories,
                history: Vec::new(),
            }),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.inner.read().await.categories.clone())
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        self.inner
            .read()
            .await
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            })
    }

    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            })?;
        *slot = Category {
            id: id.to_string(),
            ..category.clone()
        };
        Ok(())
    }

    async fn get_video(&self, id: &str) -> Result<Video, StoreError> {
        self.inner
            .read()
            .await
            .videos
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Video",
                id: id.to_string(),
            })
    }

    async fn list_videos(&self) -> Result<Vec<Video>, StoreError> {
        Ok(self.inner.read().await.videos.clone())
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError> {
        let stored = HistoryEntry {
            id: Some(new_id()),
            ..entry.clone()
        };
        self.inner.write().await.history.push(stored.clone());
        Ok(stored)
    }

    async fn create_video(&self, video: &Video) -> Result<Video, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.videos.iter().any(|v| v.id == video.id) {
            return Err(StoreError::Rejected {
                status: 409,
                body: format!("Video with id {} already exists", video.id),
            });
        }
        inner.videos.push(video.clone());
        Ok(video.clone())
    }

    async fn delete_video(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.videos.len();
        inner.videos.retain(|v| v.id != id);
        if inner.videos.len() == before {
            return Err(StoreError::NotFound {
                entity: "Video",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        let created = Category {
            id: new_id(),
            category_name: category.category_name.clone(),
            all_videos: Vec::new(),
        };
        self.inner.write().await.categories.push(created.clone());
        Ok(created)
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.categories.len();
        inner.categories.retain(|c| c.id != id);
        if inner.categories.len() == before {
            return Err(StoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.inner.read().await.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: id.to_uppercase(),
            img_url: String::new(),
            video_link: format!("https://www.youtube.com/embed/{id}"),
        }
    }

    #[tokio::test]
    async fn created_category_is_empty_and_fetchable() {
        let store = MemoryStore::new();
        let created = store
            .create_category(&NewCategory {
                category_name: "Music".into(),
            })
            .await
            .unwrap();
        assert!(created.all_videos.is_empty());

        let fetched = store.get_category(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_replaces_whole_document() {
        let store = MemoryStore::new();
        let mut cat = store
            .create_category(&NewCategory {
                category_name: "Music".into(),
            })
            .await
            .unwrap();
        cat.all_videos.push(video("a"));
        store.update_category(&cat.id, &cat).await.unwrap();

        let fetched = store.get_category(&cat.id).await.unwrap();
        assert_eq!(fetched.all_videos, vec![video("a")]);
    }

    #[tokio::test]
    async fn update_of_missing_category_is_not_found() {
        let store = MemoryStore::new();
        let cat = Category {
            id: "ghost".into(),
            category_name: "Ghost".into(),
            all_videos: vec![],
        };
        assert_matches!(
            store.update_category("ghost", &cat).await,
            Err(StoreError::NotFound { entity: "Category", .. })
        );
    }

    #[tokio::test]
    async fn duplicate_video_id_is_rejected() {
        let store = MemoryStore::new();
        store.create_video(&video("a")).await.unwrap();
        assert_matches!(
            store.create_video(&video("a")).await,
            Err(StoreError::Rejected { status: 409, .. })
        );
    }

    #[tokio::test]
    async fn delete_missing_video_is_not_found() {
        let store = MemoryStore::with_data(vec![video("a")], vec![]);
        store.delete_video("a").await.unwrap();
        assert_matches!(
            store.delete_video("a").await,
            Err(StoreError::NotFound { entity: "Video", .. })
        );
    }

    #[tokio::test]
    async fn history_keeps_insertion_order_and_assigns_ids() {
        let store = MemoryStore::new();
        let now = chrono::Utc::now();
        let first = store
            .append_history(&HistoryEntry::viewed(&video("a"), now))
            .await
            .unwrap();
        store
            .append_history(&HistoryEntry::viewed(&video("b"), now))
            .await
            .unwrap();

        assert!(first.id.is_some());
        let titles: Vec<_> = store
            .list_history()
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.title)
            .collect();
        assert_eq!(titles, ["A", "B"]);
    }
}
