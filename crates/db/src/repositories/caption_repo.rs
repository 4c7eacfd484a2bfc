//! Repository for the `captions` table.
//!
//! Reads always join the author so callers get [`CaptionWithAuthor`]
//! without a second round trip.

use captionary_core::types::DbId;
use sqlx::PgPool;

use crate::models::caption::{Caption, CaptionAuthorRow, CaptionWithAuthor, NewCaption};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, text, image_id, user_id, created_at";

/// Join projection used by every author-expanding read.
const AUTHOR_SELECT: &str = "SELECT c.id, c.text, c.image_id, c.created_at, \
                              u.id AS author_id, u.user_name AS author_user_name \
                             FROM captions c \
                             JOIN users u ON u.id = c.user_id";

/// Provides insert and lookup operations for captions.
pub struct CaptionRepo;

impl CaptionRepo {
    /// Insert a new caption, returning the created row.
    ///
    /// A missing image or user fails with a foreign key violation on
    /// `fk_captions_image` / `fk_captions_user`.
    pub async fn create(pool: &PgPool, input: &NewCaption) -> Result<Caption, sqlx::Error> {
        let query = format!(
            "INSERT INTO captions (text, image_id, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Caption>(&query)
            .bind(&input.text)
            .bind(input.image_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a caption by ID with its author.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CaptionWithAuthor>, sqlx::Error> {
        let query = format!("{AUTHOR_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CaptionAuthorRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(CaptionWithAuthor::from))
    }

    /// List captions of one image, oldest first.
    pub async fn list_for_image(
        pool: &PgPool,
        image_id: DbId,
    ) -> Result<Vec<CaptionWithAuthor>, sqlx::Error> {
        let query = format!("{AUTHOR_SELECT} WHERE c.image_id = $1 ORDER BY c.id ASC");
        let rows = sqlx::query_as::<_, CaptionAuthorRow>(&query)
            .bind(image_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CaptionWithAuthor::from).collect())
    }

    /// List captions of several images in one query, oldest first.
    pub async fn list_for_images(
        pool: &PgPool,
        image_ids: &[DbId],
    ) -> Result<Vec<CaptionWithAuthor>, sqlx::Error> {
        if image_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("{AUTHOR_SELECT} WHERE c.image_id = ANY($1) ORDER BY c.id ASC");
        let rows = sqlx::query_as::<_, CaptionAuthorRow>(&query)
            .bind(image_ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(CaptionWithAuthor::from).collect())
    }
}
