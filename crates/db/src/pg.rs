//! PostgreSQL-backed [`GalleryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use captionary_core::types::DbId;

use crate::error::StoreError;
use crate::models::caption::{Caption, CaptionWithAuthor, NewCaption};
use crate::models::image::{Image, ImageRecord, NewImage};
use crate::models::user::{NewUser, User};
use crate::repositories::{CaptionRepo, ImageRepo, UserRepo};
use crate::store::{GalleryStore, ImageInclude, ImageQuery};
use crate::DbPool;

/// Gateway over a PostgreSQL pool, delegating to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GalleryStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_user_name(&self.pool, user_name).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn create_image(&self, input: &NewImage) -> Result<Image, StoreError> {
        Ok(ImageRepo::create(&self.pool, input).await?)
    }

    async fn count_images(&self) -> Result<i64, StoreError> {
        Ok(ImageRepo::count(&self.pool).await?)
    }

    async fn find_image(
        &self,
        id: DbId,
        include: ImageInclude,
    ) -> Result<Option<ImageRecord>, StoreError> {
        let Some(image) = ImageRepo::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let captions = match include {
            ImageInclude::ImageOnly => None,
            ImageInclude::CaptionsWithAuthors => {
                Some(CaptionRepo::list_for_image(&self.pool, id).await?)
            }
        };
        Ok(Some(ImageRecord { image, captions }))
    }

    async fn list_images(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>, StoreError> {
        let images = ImageRepo::list(&self.pool, query.order).await?;
        if query.include == ImageInclude::ImageOnly {
            return Ok(images.into_iter().map(ImageRecord::bare).collect());
        }

        let ids: Vec<DbId> = images.iter().map(|image| image.id).collect();
        let mut by_image: HashMap<DbId, Vec<CaptionWithAuthor>> = HashMap::new();
        for caption in CaptionRepo::list_for_images(&self.pool, &ids).await? {
            by_image.entry(caption.image_id).or_default().push(caption);
        }

        Ok(images
            .into_iter()
            .map(|image| {
                let captions = by_image.remove(&image.id).unwrap_or_default();
                ImageRecord {
                    image,
                    captions: Some(captions),
                }
            })
            .collect())
    }

    async fn create_caption(&self, input: &NewCaption) -> Result<Caption, StoreError> {
        Ok(CaptionRepo::create(&self.pool, input).await?)
    }

    async fn find_caption(&self, id: DbId) -> Result<Option<CaptionWithAuthor>, StoreError> {
        Ok(CaptionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_captions(&self, image_id: DbId) -> Result<Vec<CaptionWithAuthor>, StoreError> {
        Ok(CaptionRepo::list_for_image(&self.pool, image_id).await?)
    }
}
