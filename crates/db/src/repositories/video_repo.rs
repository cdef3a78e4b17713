//! Repository for the `videos` table.

use sqlx::PgPool;
use vidshelf_core::model::Video;

use crate::models::video::VideoRow;

/// Column list for `videos` queries.
const COLUMNS: &str = "id, title, img_url, video_link, created_at";

/// Provides CRUD operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video. A duplicate id violates the primary key.
    pub async fn create(pool: &PgPool, video: &Video) -> Result<VideoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos (id, title, img_url, video_link) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(&video.id)
            .bind(&video.title)
            .bind(&video.img_url)
            .bind(&video.video_link)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<VideoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, VideoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All videos in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<VideoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY created_at, id");
        sqlx::query_as::<_, VideoRow>(&query).fetch_all(pool).await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
