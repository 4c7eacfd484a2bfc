//! Caption entity model and DTOs.

use captionary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::user::UserSummary;

/// Foreign key from `captions.image_id` to `images.id`.
pub const FK_CAPTIONS_IMAGE: &str = "fk_captions_image";
/// Foreign key from `captions.user_id` to `users.id`.
pub const FK_CAPTIONS_USER: &str = "fk_captions_user";

/// A row from the `captions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub id: DbId,
    pub text: String,
    pub image_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for creating a new caption.
#[derive(Debug, Clone)]
pub struct NewCaption {
    pub image_id: DbId,
    pub user_id: DbId,
    pub text: String,
}

/// A caption with its author expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionWithAuthor {
    pub id: DbId,
    pub text: String,
    pub image_id: DbId,
    pub created_at: Timestamp,
    pub user: UserSummary,
}

impl CaptionWithAuthor {
    pub fn new(caption: Caption, user: UserSummary) -> Self {
        Self {
            id: caption.id,
            text: caption.text,
            image_id: caption.image_id,
            created_at: caption.created_at,
            user,
        }
    }
}

/// Flat join row of `captions` and `users`, as selected by the caption repo.
#[derive(Debug, FromRow)]
pub(crate) struct CaptionAuthorRow {
    pub id: DbId,
    pub text: String,
    pub image_id: DbId,
    pub created_at: Timestamp,
    pub author_id: DbId,
    pub author_user_name: String,
}

impl From<CaptionAuthorRow> for CaptionWithAuthor {
    fn from(row: CaptionAuthorRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            image_id: row.image_id,
            created_at: row.created_at,
            user: UserSummary {
                id: row.author_id,
                user_name: row.author_user_name,
            },
        }
    }
}
