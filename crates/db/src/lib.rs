//! PostgreSQL storage for the vidshelf document collections.
//!
//! [`PgStore`] implements [`RemoteStore`](vidshelf_core::store::RemoteStore)
//! on top of the repositories. Each store call is a single statement; no call
//! spans a transaction, matching the contract every other backend offers.

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgStore;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
