//! Persistence layer for Captionary.
//!
//! - [`models`] -- row structs, create DTOs and serializable read shapes.
//! - [`repositories`] -- zero-sized repos with async SQL over `&PgPool`.
//! - [`store`] -- the [`GalleryStore`] gateway trait and its query options.
//! - [`pg`] / [`memory`] -- the PostgreSQL and in-memory gateway backends.
//! - [`seed`] -- initial image rows.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod seed;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{GalleryStore, ImageInclude, ImageQuery, SortOrder};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
