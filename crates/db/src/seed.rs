//! Initial image rows.
//!
//! Images cannot be uploaded through the application; this loader is the
//! only producer of `images` rows. It is a no-op once any image exists.

use crate::error::StoreError;
use crate::models::image::NewImage;
use crate::store::GalleryStore;

/// URLs inserted, in order, into an empty `images` table.
pub const INITIAL_IMAGES: [&str; 5] = [
    "https://as2.ftcdn.net/jpg/02/50/17/85/1000_F_250178509_ozTzYHbSHTlxARK4FvYVQ4i40p44822n.jpg",
    "https://media.gettyimages.com/id/109350684/de/foto/gesch%C3%A4ftsleute-mit-ihren-kopf-in-metall-tubing.jpg?s=2048x2048&w=gi&k=20&c=fxvo9SGNEyMg9wjj3fc9vWuc2KJI5c1DxKzOUg1WyDE=",
    "https://images.unsplash.com/photo-1507808973436-a4ed7b5e87c9?q=80&w=2960&auto=format&fit=crop&ixlib=rb-4.1.0&ixid=M3wxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8fA%3D%3D",
    "https://media.istockphoto.com/id/1582008312/photo/flooded-park-bench.jpg?s=1024x1024&w=is&k=20&c=-xGPJ_vIhTaoCDhl7PQ-MdnL2uGBtHPh81NnQuD9Z64=",
    "https://media.gettyimages.com/id/1157192647/de/foto/woman-with-blue-headphones-listening-music-hanging-on-goal.jpg?s=2048x2048&w=gi&k=20&c=34yGVD0ropQbj25h6rNhLDAfZtwnDg3PPv1tZsMj5C4=",
];

/// Insert [`INITIAL_IMAGES`] if the table is empty.
///
/// Returns the number of rows inserted (0 when already seeded).
pub async fn seed_images(store: &dyn GalleryStore) -> Result<usize, StoreError> {
    let existing = store.count_images().await?;
    if existing > 0 {
        tracing::debug!(existing, "Images already seeded");
        return Ok(0);
    }

    for url in INITIAL_IMAGES {
        store.create_image(&NewImage { url: url.to_string() }).await?;
    }
    tracing::info!(count = INITIAL_IMAGES.len(), "Seeded initial images");
    Ok(INITIAL_IMAGES.len())
}
