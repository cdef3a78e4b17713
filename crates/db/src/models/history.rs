//! History row model.

use sqlx::FromRow;
use vidshelf_core::model::HistoryEntry;
use vidshelf_core::types::Timestamp;

/// A row from the `history` table.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: i64,
    pub title: String,
    pub video_link: String,
    pub time_stamp: Timestamp,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            id: Some(row.id.to_string()),
            title: row.title,
            video_link: row.video_link,
            time_stamp: row.time_stamp,
        }
    }
}
