//! Image entity model and read shapes.

use captionary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::caption::CaptionWithAuthor;

/// A row from the `images` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: DbId,
    pub url: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new image.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
}

/// An image plus, when requested, its captions.
///
/// Serializes flat: `{ "id", "url", "createdAt", "captions": [...] }`.
/// `captions` is omitted when the query did not expand it.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    #[serde(flatten)]
    pub image: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captions: Option<Vec<CaptionWithAuthor>>,
}

impl ImageRecord {
    pub fn bare(image: Image) -> Self {
        Self {
            image,
            captions: None,
        }
    }

    /// Captions of this image, empty when they were not expanded.
    pub fn captions(&self) -> &[CaptionWithAuthor] {
        self.captions.as_deref().unwrap_or_default()
    }
}
