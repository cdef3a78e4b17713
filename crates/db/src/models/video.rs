//! Video row model.

use sqlx::FromRow;
use vidshelf_core::model::Video;
use vidshelf_core::types::Timestamp;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: String,
    pub title: String,
    pub img_url: String,
    pub video_link: String,
    pub created_at: Timestamp,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            title: row.title,
            img_url: row.img_url,
            video_link: row.video_link,
        }
    }
}
