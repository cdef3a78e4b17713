//! Read-only projections rendered by the view layer.
//!
//! Views are rebuilt from scratch after every snapshot reload and whenever
//! the video collection changes. They carry no state of their own.

use serde::Serialize;

use crate::membership::Snapshot;
use crate::model::{Category, Video};
use crate::types::EntityId;

/// The unassigned pool: videos not listed by any category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolView {
    pub videos: Vec<Video>,
}

impl PoolView {
    pub fn project(snapshot: &Snapshot, all_videos: &[Video]) -> Self {
        Self {
            videos: snapshot.unassigned(all_videos),
        }
    }
}

/// One category drop target with its member cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: EntityId,
    pub category_name: String,
    pub videos: Vec<Video>,
}

impl CategoryView {
    pub fn project_all(snapshot: &Snapshot) -> Vec<Self> {
        snapshot.categories().iter().map(Self::from).collect()
    }
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            category_name: category.category_name.clone(),
            videos: category.all_videos.clone(),
        }
    }
}

/// Everything a drag-and-drop screen renders: the pool plus every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub pool: PoolView,
    pub categories: Vec<CategoryView>,
}

impl BoardView {
    pub fn project(snapshot: &Snapshot, all_videos: &[Video]) -> Self {
        Self {
            pool: PoolView::project(snapshot, all_videos),
            categories: CategoryView::project_all(snapshot),
        }
    }
}
