//! Handlers for the `/api/images` resource.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use captionary_db::models::caption::CaptionWithAuthor;
use captionary_db::models::image::ImageRecord;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_image_id;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/images/{id}/captions`.
///
/// The author is always the session user; any `userId` in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateCaptionRequest {
    #[serde(default)]
    pub text: String,
}

/// GET /api/images
pub async fn list_images(State(state): State<AppState>) -> AppResult<Json<Arc<Vec<ImageRecord>>>> {
    let images = state.gallery.list_images().await?;
    Ok(Json(images))
}

/// GET /api/images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Arc<ImageRecord>>> {
    let id = parse_image_id(&id)?;
    let image = state.gallery.get_image(id).await?;
    Ok(Json(image))
}

/// POST /api/images/{id}/captions
///
/// Requires a session. Responds `201` with the created caption and its author.
pub async fn create_caption(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateCaptionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CaptionWithAuthor>)> {
    let image_id = parse_image_id(&id)?;
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let caption = state
        .gallery
        .add_caption(image_id, user.user_id, &input.text)
        .await?;
    Ok((StatusCode::CREATED, Json(caption)))
}
