//! Repository for the append-only `history` table.

use sqlx::PgPool;
use vidshelf_core::model::HistoryEntry;

use crate::models::history::HistoryRow;

const COLUMNS: &str = "id, title, video_link, time_stamp";

pub struct HistoryRepo;

impl HistoryRepo {
    pub async fn append(pool: &PgPool, entry: &HistoryEntry) -> Result<HistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO history (title, video_link, time_stamp) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(&entry.title)
            .bind(&entry.video_link)
            .bind(entry.time_stamp)
            .fetch_one(pool)
            .await
    }

    /// All entries in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history ORDER BY id");
        sqlx::query_as::<_, HistoryRow>(&query)
            .fetch_all(pool)
            .await
    }
}
