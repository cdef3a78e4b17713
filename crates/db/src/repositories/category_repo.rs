//! Repository for the `categories` table.

use sqlx::types::Json;
use sqlx::PgPool;
use vidshelf_core::model::Video;

use crate::models::category::CategoryRow;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, category_name, all_videos, created_at, updated_at";

/// Provides CRUD operations for categories and their member lists.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert an empty category.
    pub async fn create(pool: &PgPool, category_name: &str) -> Result<CategoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (category_name) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(category_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<CategoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All categories in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY id");
        sqlx::query_as::<_, CategoryRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the name and member list of a category (whole-document write).
    ///
    /// Returns `None` if no category with the given ID exists.
    pub async fn replace(
        pool: &PgPool,
        id: i64,
        category_name: &str,
        all_videos: &[Video],
    ) -> Result<Option<CategoryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                 category_name = $2, \
                 all_videos = $3, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .bind(category_name)
            .bind(Json(all_videos))
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
