use axum::routing::{get, post};
use axum::Router;

use crate::handlers::views;
use crate::state::AppState;

/// HTML gallery pages.
///
/// ```text
/// /                          image listing (GET)
/// /images/{id}               single image (GET)
/// /images/{id}/captions      caption form submit (POST, requires session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(views::index))
        .route("/images/{id}", get(views::image_page))
        .route("/images/{id}/captions", post(views::submit_caption))
}
