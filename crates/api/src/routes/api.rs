use axum::routing::{get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /images                    list (GET)
/// /images/{id}               get (GET)
/// /images/{id}/captions      create caption (POST, requires session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", get(images::list_images))
        .route("/images/{id}", get(images::get_image))
        .route("/images/{id}/captions", post(images::create_caption))
}
