//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async SQL methods
//! that accept `&PgPool` as the first argument.

pub mod caption_repo;
pub mod image_repo;
pub mod user_repo;

pub use caption_repo::CaptionRepo;
pub use image_repo::ImageRepo;
pub use user_repo::UserRepo;
