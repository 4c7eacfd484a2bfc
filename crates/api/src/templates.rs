//! Askama page templates and the view models they render.
//!
//! Every page extends `base.html`, which reads `viewer` to show either the
//! logged-in user name or the login/register links.

use askama::Template;
use axum::response::Html;
use captionary_core::types::DbId;
use captionary_db::models::image::ImageRecord;

pub struct CaptionView {
    pub text: String,
    pub author: String,
}

pub struct ImageView {
    pub id: DbId,
    pub url: String,
    pub captions: Vec<CaptionView>,
}

impl From<&ImageRecord> for ImageView {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: record.image.id,
            url: record.image.url.clone(),
            captions: record
                .captions()
                .iter()
                .map(|c| CaptionView {
                    text: c.text.clone(),
                    author: c.user.user_name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub viewer: Option<String>,
    pub images: Vec<ImageView>,
}

#[derive(Template)]
#[template(path = "image.html")]
pub struct ImagePage {
    pub viewer: Option<String>,
    pub image: ImageView,
    pub max_caption_length: usize,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub viewer: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub viewer: Option<String>,
    pub min_password_length: usize,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub viewer: Option<String>,
    pub status: u16,
    pub message: String,
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, askama::Error> {
    template.render().map(Html)
}
