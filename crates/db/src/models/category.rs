//! Category row model.

use sqlx::types::Json;
use sqlx::FromRow;
use vidshelf_core::model::{Category, Video};
use vidshelf_core::types::Timestamp;

/// A row from the `categories` table. Members live in the JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub category_name: String,
    pub all_videos: Json<Vec<Video>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id.to_string(),
            category_name: row.category_name,
            all_videos: row.all_videos.0,
        }
    }
}
