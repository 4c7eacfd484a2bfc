//! In-process [`GalleryStore`] used by tests and `STORAGE_BACKEND=memory`.
//!
//! Mirrors the PostgreSQL schema closely enough for the HTTP layer not to
//! tell the difference: ids are sequential from 1, unique and foreign key
//! checks fail with the same constraint names as the migrations.

use async_trait::async_trait;
use captionary_core::types::DbId;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::caption::{
    Caption, CaptionWithAuthor, NewCaption, FK_CAPTIONS_IMAGE, FK_CAPTIONS_USER,
};
use crate::models::image::{Image, ImageRecord, NewImage};
use crate::models::user::{NewUser, User, UserSummary, UQ_USERS_EMAIL, UQ_USERS_USER_NAME};
use crate::store::{GalleryStore, ImageInclude, ImageQuery, SortOrder};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    images: Vec<Image>,
    captions: Vec<Caption>,
}

impl Tables {
    fn next_id<T>(rows: &[T]) -> DbId {
        rows.len() as DbId + 1
    }

    fn user(&self, id: DbId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn image(&self, id: DbId) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id)
    }

    /// Captions of `image_id` with their authors, ascending by id.
    fn captions_for(&self, image_id: DbId) -> Vec<CaptionWithAuthor> {
        self.captions
            .iter()
            .filter(|c| c.image_id == image_id)
            .filter_map(|c| self.with_author(c))
            .collect()
    }

    fn with_author(&self, caption: &Caption) -> Option<CaptionWithAuthor> {
        let author = self.user(caption.user_id)?;
        Some(CaptionWithAuthor::new(caption.clone(), UserSummary::from(author)))
    }

    fn record(&self, image: &Image, include: ImageInclude) -> ImageRecord {
        let captions = match include {
            ImageInclude::ImageOnly => None,
            ImageInclude::CaptionsWithAuthors => Some(self.captions_for(image.id)),
        };
        ImageRecord {
            image: image.clone(),
            captions,
        }
    }
}

/// Vector-backed store guarded by a single async `RwLock`.
///
/// Rows are never deleted, so `len + 1` is always a fresh id.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_USERS_EMAIL.to_string(),
            });
        }
        if tables.users.iter().any(|u| u.user_name == input.user_name) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_USERS_USER_NAME.to_string(),
            });
        }

        let user = User {
            id: Tables::next_id(&tables.users),
            email: input.email.clone(),
            user_name: input.user_name.clone(),
            password_hash: input.password_hash.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn find_user_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user_name == user_name).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn create_image(&self, input: &NewImage) -> Result<Image, StoreError> {
        let mut tables = self.tables.write().await;
        let image = Image {
            id: Tables::next_id(&tables.images),
            url: input.url.clone(),
            created_at: Utc::now(),
        };
        tables.images.push(image.clone());
        Ok(image)
    }

    async fn count_images(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.images.len() as i64)
    }

    async fn find_image(
        &self,
        id: DbId,
        include: ImageInclude,
    ) -> Result<Option<ImageRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.image(id).map(|image| tables.record(image, include)))
    }

    async fn list_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut records: Vec<ImageRecord> = tables
            .images
            .iter()
            .map(|image| tables.record(image, query.include))
            .collect();
        if query.order == SortOrder::Descending {
            records.reverse();
        }
        Ok(records)
    }

    async fn create_caption(&self, input: &NewCaption) -> Result<Caption, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.image(input.image_id).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: FK_CAPTIONS_IMAGE.to_string(),
            });
        }
        if tables.user(input.user_id).is_none() {
            return Err(StoreError::ForeignKeyViolation {
                constraint: FK_CAPTIONS_USER.to_string(),
            });
        }

        let caption = Caption {
            id: Tables::next_id(&tables.captions),
            text: input.text.clone(),
            image_id: input.image_id,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        tables.captions.push(caption.clone());
        Ok(caption)
    }

    async fn find_caption(&self, id: DbId) -> Result<Option<CaptionWithAuthor>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .captions
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| tables.with_author(c)))
    }

    async fn list_captions(&self, image_id: DbId) -> Result<Vec<CaptionWithAuthor>, StoreError> {
        Ok(self.tables.read().await.captions_for(image_id))
    }
}
