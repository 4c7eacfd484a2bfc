//! HTML gallery pages.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;

use crate::error::{AppError, PageResult};
use crate::gallery::MAX_CAPTION_LENGTH;
use crate::handlers::parse_image_id;
use crate::middleware::auth::{AuthContext, PageUser};
use crate::state::AppState;
use crate::templates::{render_template, ImagePage, ImageView, IndexPage};

/// Form body for `POST /images/{id}/captions`.
#[derive(Debug, Deserialize)]
pub struct CaptionForm {
    #[serde(default)]
    pub text: String,
}

/// GET /
pub async fn index(State(state): State<AppState>, auth: AuthContext) -> PageResult<Html<String>> {
    let images = state.gallery.list_images().await?;
    let page = IndexPage {
        viewer: auth.viewer(),
        images: images.iter().map(ImageView::from).collect(),
    };
    Ok(render_template(page)?)
}

/// GET /images/{id}
pub async fn image_page(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let id = parse_image_id(&id)?;
    let image = state.gallery.get_image(id).await?;
    let page = ImagePage {
        viewer: auth.viewer(),
        image: ImageView::from(image.as_ref()),
        max_caption_length: MAX_CAPTION_LENGTH,
    };
    Ok(render_template(page)?)
}

/// POST /images/{id}/captions
///
/// Requires a session; redirects back to the image page on success.
pub async fn submit_caption(
    viewer: PageUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<CaptionForm>, FormRejection>,
) -> PageResult<Redirect> {
    let image_id = parse_image_id(&id)?;
    let Form(input) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    state
        .gallery
        .add_caption(image_id, viewer.user.user_id, &input.text)
        .await?;
    Ok(Redirect::to(&format!("/images/{image_id}")))
}
