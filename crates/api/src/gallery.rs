//! Gallery operations shared by the JSON API and the HTML pages.
//!
//! Reads go through the [`ReadCache`]; creating a caption invalidates both the
//! listing entry and the affected image's entry before returning, so the next
//! read of either reflects the new caption.

use std::sync::Arc;

use captionary_core::cache::{keys, ReadCache};
use captionary_core::error::CoreError;
use captionary_core::types::DbId;
use captionary_core::validation::require_non_blank;
use captionary_db::models::caption::{CaptionWithAuthor, NewCaption};
use captionary_db::models::image::ImageRecord;
use captionary_db::models::user::{NewUser, User, UQ_USERS_EMAIL, UQ_USERS_USER_NAME};
use captionary_db::{GalleryStore, ImageInclude, ImageQuery, StoreError};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};

/// Longest caption accepted, in characters.
pub const MAX_CAPTION_LENGTH: usize = 1000;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Values held by the read cache.
#[derive(Clone)]
pub enum CachedRead {
    Images(Arc<Vec<ImageRecord>>),
    Image(Arc<ImageRecord>),
}

pub struct GalleryService {
    store: Arc<dyn GalleryStore>,
    cache: Arc<ReadCache<CachedRead>>,
    password_min_length: usize,
}

impl GalleryService {
    pub fn new(
        store: Arc<dyn GalleryStore>,
        cache: Arc<ReadCache<CachedRead>>,
        password_min_length: usize,
    ) -> Self {
        Self {
            store,
            cache,
            password_min_length,
        }
    }

    pub fn cache(&self) -> &ReadCache<CachedRead> {
        &self.cache
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// All images ascending by id, each with its captions and their authors.
    pub async fn list_images(&self) -> AppResult<Arc<Vec<ImageRecord>>> {
        if let Some(CachedRead::Images(images)) = self.cache.get(keys::IMAGES) {
            tracing::debug!(key = keys::IMAGES, "Cache hit");
            return Ok(images);
        }

        tracing::debug!(key = keys::IMAGES, "Cache miss");
        let images = Arc::new(self.store.list_images(&ImageQuery::default()).await?);
        self.cache
            .set(keys::IMAGES, CachedRead::Images(Arc::clone(&images)));
        Ok(images)
    }

    /// One image with its captions and their authors.
    pub async fn get_image(&self, id: DbId) -> AppResult<Arc<ImageRecord>> {
        let key = keys::image(id);
        if let Some(CachedRead::Image(image)) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(image);
        }

        tracing::debug!(key = %key, "Cache miss");
        let image = self
            .store
            .find_image(id, ImageInclude::CaptionsWithAuthors)
            .await?
            .ok_or(CoreError::NotFound { entity: "Image", id })?;
        let image = Arc::new(image);
        self.cache.set(key, CachedRead::Image(Arc::clone(&image)));
        Ok(image)
    }

    /// Attach a caption written by `user_id` to image `image_id`.
    pub async fn add_caption(
        &self,
        image_id: DbId,
        user_id: DbId,
        text: &str,
    ) -> AppResult<CaptionWithAuthor> {
        let text = require_non_blank("text", text)?;
        if text.chars().count() > MAX_CAPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "text must be at most {MAX_CAPTION_LENGTH} characters"
            ))
            .into());
        }

        if self
            .store
            .find_image(image_id, ImageInclude::ImageOnly)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound {
                entity: "Image",
                id: image_id,
            }
            .into());
        }
        if self.store.find_user(user_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into());
        }

        let caption = self
            .store
            .create_caption(&NewCaption {
                image_id,
                user_id,
                text: text.to_string(),
            })
            .await?;

        self.cache.del(keys::IMAGES);
        self.cache.del(&keys::image(image_id));

        tracing::info!(caption_id = caption.id, image_id, user_id, "Caption created");

        let created = self.store.find_caption(caption.id).await?.ok_or_else(|| {
            AppError::InternalError(format!("caption {} vanished after insert", caption.id))
        })?;
        Ok(created)
    }

    /// Create an account. The password is stored only as an Argon2id hash.
    pub async fn register(&self, user_name: &str, email: &str, password: &str) -> AppResult<User> {
        let user_name = require_non_blank("userName", user_name)?;
        let email = require_non_blank("email", email)?;
        validate_password_strength(password, self.password_min_length)?;

        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

        let input = NewUser {
            user_name: user_name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        let user = self.store.create_user(&input).await.map_err(|err| match err {
            StoreError::UniqueViolation { constraint } if constraint == UQ_USERS_EMAIL => {
                AppError::Core(CoreError::UniqueConstraint { field: "email" })
            }
            StoreError::UniqueViolation { constraint } if constraint == UQ_USERS_USER_NAME => {
                AppError::Core(CoreError::UniqueConstraint { field: "userName" })
            }
            other => AppError::Store(other),
        })?;

        tracing::info!(user_id = user.id, user_name = %user.user_name, "User registered");
        Ok(user)
    }

    /// Check a user name and password pair.
    ///
    /// Unknown users and wrong passwords produce the same error. A stored
    /// hash that cannot be parsed also fails the login.
    pub async fn authenticate(&self, user_name: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.store.find_user_by_user_name(user_name.trim()).await? else {
            tracing::debug!(user_name, "Login for unknown user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::debug!(user_id = user.id, "Login with wrong password");
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Stored password hash is unusable");
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}
