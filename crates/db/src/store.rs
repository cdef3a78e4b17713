use async_trait::async_trait;
use vidshelf_core::error::StoreError;
use vidshelf_core::model::{Category, HistoryEntry, NewCategory, Video};
use vidshelf_core::store::RemoteStore;

use crate::repositories::{CategoryRepo, HistoryRepo, VideoRepo};
use crate::DbPool;

/// [`RemoteStore`] over PostgreSQL.
///
/// Category ids are `BIGSERIAL` keys rendered as strings; an id that does not
/// parse as an integer cannot exist and is reported as not found.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn not_found(entity: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn category_key(id: &str) -> Result<i64, StoreError> {
    id.parse().map_err(|_| not_found("Category", id))
}

/// Classify a sqlx error into the store contract.
///
/// - Unique constraint violations (SQLSTATE `23505`) map to a 409 rejection.
/// - Connection and pool failures map to `Unavailable`.
/// - Column decoding failures map to `Decode`.
fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            StoreError::Rejected {
                status: 409,
                body: db_err.message().to_string(),
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Decode(err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Rejected {
                status: 500,
                body: other.to_string(),
            }
        }
    }
}

#[async_trait]
impl RemoteStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = CategoryRepo::list(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_category(&self, id: &str) -> Result<Category, StoreError> {
        let key = category_key(id)?;
        CategoryRepo::find_by_id(&self.pool, key)
            .await
            .map_err(classify_sqlx_error)?
            .map(Category::from)
            .ok_or_else(|| not_found("Category", id))
    }

    async fn update_category(&self, id: &str, category: &Category) -> Result<(), StoreError> {
        let key = category_key(id)?;
        CategoryRepo::replace(
            &self.pool,
            key,
            &category.category_name,
            &category.all_videos,
        )
        .await
        .map_err(classify_sqlx_error)?
        .map(|_| ())
        .ok_or_else(|| not_found("Category", id))
    }

    async fn get_video(&self, id: &str) -> Result<Video, StoreError> {
        VideoRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?
            .map(Video::from)
            .ok_or_else(|| not_found("Video", id))
    }

    async fn list_videos(&self) -> Result<Vec<Video>, StoreError> {
        let rows = VideoRepo::list(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(rows.into_iter().map(Video::from).collect())
    }

    async fn append_history(&self, entry: &HistoryEntry) -> Result<HistoryEntry, StoreError> {
        HistoryRepo::append(&self.pool, entry)
            .await
            .map(HistoryEntry::from)
            .map_err(classify_sqlx_error)
    }

    async fn create_video(&self, video: &Video) -> Result<Video, StoreError> {
        VideoRepo::create(&self.pool, video)
            .await
            .map(Video::from)
            .map_err(classify_sqlx_error)
    }

    async fn delete_video(&self, id: &str) -> Result<(), StoreError> {
        let deleted = VideoRepo::delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)?;
        if deleted {
            Ok(())
        } else {
            Err(not_found("Video", id))
        }
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, StoreError> {
        CategoryRepo::create(&self.pool, &category.category_name)
            .await
            .map(Category::from)
            .map_err(classify_sqlx_error)
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let key = category_key(id)?;
        let deleted = CategoryRepo::delete(&self.pool, key)
            .await
            .map_err(classify_sqlx_error)?;
        if deleted {
            Ok(())
        } else {
            Err(not_found("Category", id))
        }
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows = HistoryRepo::list(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}
