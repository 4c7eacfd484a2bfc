//! Repository for the `images` table.

use captionary_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{Image, NewImage};
use crate::store::SortOrder;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, url, created_at";

/// Provides insert and lookup operations for images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (url)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    /// Find an image by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all images ordered by id in the given direction.
    pub async fn list(pool: &PgPool, order: SortOrder) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images ORDER BY id {}", order.as_sql());
        sqlx::query_as::<_, Image>(&query).fetch_all(pool).await
    }

    /// Total number of images.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM images")
            .fetch_one(pool)
            .await
    }
}
