//! Which video belongs to which category.
//!
//! Membership is stored only inside each category's `all_videos` list. A
//! video's [`Location`] is always derived by scanning the snapshot; the
//! unassigned pool is the set difference between the video collection and
//! every category's members.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::{CoreError, StoreError};
use crate::model::{Category, Video};
use crate::store::RemoteStore;
use crate::types::{EntityId, Timestamp};

/// Where a video currently lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Unassigned,
    InCategory(EntityId),
}

/// Full copy of the category collection as last fetched from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    categories: Vec<Category>,
    /// `None` until the first successful load.
    loaded_at: Option<Timestamp>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            loaded_at: None,
        }
    }

    pub fn new(categories: Vec<Category>, loaded_at: Timestamp) -> Self {
        Self {
            categories,
            loaded_at: Some(loaded_at),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn loaded_at(&self) -> Option<Timestamp> {
        self.loaded_at
    }

    pub fn category_by_id(&self, id: &str) -> Result<&Category, CoreError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Category",
                id: id.to_string(),
            })
    }

    /// The first category (in store order) listing `video_id`.
    pub fn locate(&self, video_id: &str) -> Location {
        self.categories
            .iter()
            .find(|c| c.contains(video_id))
            .map_or(Location::Unassigned, |c| Location::InCategory(c.id.clone()))
    }

    /// Videos from `all_videos` not present in any category, in input order.
    pub fn unassigned(&self, all_videos: &[Video]) -> Vec<Video> {
        let assigned: HashSet<&str> = self
            .categories
            .iter()
            .flat_map(|c| c.all_videos.iter().map(|v| v.id.as_str()))
            .collect();

        all_videos
            .iter()
            .filter(|v| !assigned.contains(v.id.as_str()))
            .cloned()
            .collect()
    }

    /// Video ids listed by more than one category, with the categories that
    /// list them (store order). Sorted by video id.
    ///
    /// Only an interrupted transfer leaves the store in this state.
    pub fn duplicate_memberships(&self) -> Vec<(EntityId, Vec<EntityId>)> {
        let mut holders: HashMap<&str, Vec<EntityId>> = HashMap::new();
        for category in &self.categories {
            let mut seen = HashSet::new();
            for video in &category.all_videos {
                if seen.insert(video.id.as_str()) {
                    holders
                        .entry(video.id.as_str())
                        .or_default()
                        .push(category.id.clone());
                }
            }
        }

        let mut dups: Vec<_> = holders
            .into_iter()
            .filter(|(_, cats)| cats.len() > 1)
            .map(|(id, cats)| (id.to_string(), cats))
            .collect();
        dups.sort_by(|a, b| a.0.cmp(&b.0));
        dups
    }
}

/// Holds the last-fetched [`Snapshot`] and publishes every replacement.
///
/// The snapshot is only ever replaced wholesale by [`MembershipModel::load`];
/// nothing edits it in place.
pub struct MembershipModel {
    store: Arc<dyn RemoteStore>,
    current: watch::Sender<Arc<Snapshot>>,
}

impl MembershipModel {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (current, _) = watch::channel(Arc::new(Snapshot::empty()));
        Self { store, current }
    }

    /// Fetch the full category collection and replace the snapshot.
    ///
    /// Any store failure is reported as [`CoreError::Fetch`] and leaves the
    /// previous snapshot in place.
    pub async fn load(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.reload()
            .await
            .map_err(|e| CoreError::Fetch(e.to_string()))
    }

    pub(crate) async fn reload(&self) -> Result<Arc<Snapshot>, StoreError> {
        let categories = self.store.list_categories().await?;
        let snapshot = Arc::new(Snapshot::new(categories, chrono::Utc::now()));

        for (video_id, category_ids) in snapshot.duplicate_memberships() {
            tracing::warn!(
                video_id = %video_id,
                categories = ?category_ids,
                "Video is a member of more than one category",
            );
        }

        tracing::debug!(
            categories = snapshot.categories().len(),
            "Membership snapshot reloaded"
        );
        self.current.send_replace(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The last successfully loaded snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.borrow().clone()
    }

    pub fn unassigned(&self, all_videos: &[Video]) -> Vec<Video> {
        self.snapshot().unassigned(all_videos)
    }

    pub fn category_by_id(&self, id: &str) -> Result<Category, CoreError> {
        self.snapshot().category_by_id(id).cloned()
    }

    pub fn locate(&self, video_id: &str) -> Location {
        self.snapshot().locate(video_id)
    }

    /// Observe every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.current.subscribe()
    }
}
