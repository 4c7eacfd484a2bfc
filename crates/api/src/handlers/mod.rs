//! Request handlers.
//!
//! - [`images`] -- JSON API under `/api`.
//! - [`views`] -- HTML gallery pages.
//! - [`auth`] -- Register, login and logout pages.
//!
//! Handlers delegate to [`crate::gallery::GalleryService`] and map errors via
//! [`crate::error::AppError`] (JSON) or [`crate::error::PageError`] (HTML).

pub mod auth;
pub mod images;
pub mod views;

use captionary_core::types::DbId;

use crate::error::AppError;

/// Parse an image id path segment. Anything non-numeric names no image.
pub(crate) fn parse_image_id(raw: &str) -> Result<DbId, AppError> {
    raw.parse::<DbId>()
        .map_err(|_| AppError::NotFound(format!("Image with id {raw} not found")))
}
