//! The persistence gateway.
//!
//! [`GalleryStore`] is the only writer of users, images and captions. Route
//! handlers reach it through the gallery service, never directly through a
//! pool, so tests can swap in [`MemoryStore`](crate::MemoryStore).

use async_trait::async_trait;
use captionary_core::types::DbId;

use crate::error::StoreError;
use crate::models::caption::{Caption, CaptionWithAuthor, NewCaption};
use crate::models::image::{Image, ImageRecord, NewImage};
use crate::models::user::{NewUser, User};

/// Which relations to attach to an image read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageInclude {
    /// The image row alone.
    ImageOnly,
    /// The image, its captions, and each caption's author.
    #[default]
    CaptionsWithAuthors,
}

/// Ordering by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Options for [`GalleryStore::list_images`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageQuery {
    pub include: ImageInclude,
    pub order: SortOrder,
}

/// Create / find-by-id / find-all access to the three entities.
///
/// Missing rows are `Ok(None)`, never an error. Captions attached to an
/// image are always ordered by ascending id.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_user_name(&self, user_name: &str)
        -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_image(&self, input: &NewImage) -> Result<Image, StoreError>;
    async fn count_images(&self) -> Result<i64, StoreError>;
    async fn find_image(
        &self,
        id: DbId,
        include: ImageInclude,
    ) -> Result<Option<ImageRecord>, StoreError>;
    async fn list_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, StoreError>;

    async fn create_caption(&self, input: &NewCaption) -> Result<Caption, StoreError>;
    async fn find_caption(&self, id: DbId) -> Result<Option<CaptionWithAuthor>, StoreError>;
    async fn list_captions(&self, image_id: DbId) -> Result<Vec<CaptionWithAuthor>, StoreError>;
}
