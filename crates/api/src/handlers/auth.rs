//! Handlers for account pages: register, login, logout.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use captionary_core::validation::validate_input;
use serde::Deserialize;
use validator::Validate;

use crate::auth::session::{SessionUser, SESSION_COOKIE};
use crate::error::{AppError, PageResult};
use crate::middleware::auth::{AuthContext, PageUser};
use crate::state::AppState;
use crate::templates::{render_template, LoginPage, RegisterPage};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Form body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "userName must be 1 to 50 characters"))]
    pub user_name: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Form body for `POST /login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /register
pub async fn register_page(
    State(state): State<AppState>,
    auth: AuthContext,
) -> PageResult<Html<String>> {
    Ok(render_template(RegisterPage {
        viewer: auth.viewer(),
        min_password_length: state.config.password_min_length,
    })?)
}

/// POST /register
///
/// Creates the account and sends the user to the login page. A taken email
/// or user name is a 409 and leaves existing rows untouched.
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> PageResult<Redirect> {
    let Form(input) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    validate_input(&input)?;

    state
        .gallery
        .register(&input.user_name, &input.email, &input.password)
        .await?;
    Ok(Redirect::to("/login"))
}

/// GET /login
pub async fn login_page(auth: AuthContext) -> PageResult<Html<String>> {
    Ok(render_template(LoginPage {
        viewer: auth.viewer(),
    })?)
}

/// POST /login
///
/// On success starts a session, sets the session cookie and redirects home.
/// Wrong credentials render a 401 page and set no cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> PageResult<(CookieJar, Redirect)> {
    let Form(input) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let user = state
        .gallery
        .authenticate(&input.user_name, &input.password)
        .await?;

    let value = state.sessions.create(SessionUser {
        user_id: user.id,
        user_name: user.user_name.clone(),
    });
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    tracing::info!(user_id = user.id, "User logged in");
    Ok((jar.add(cookie), Redirect::to("/")))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    viewer: PageUser,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(value) = viewer.cookie.as_deref() {
        state.sessions.destroy(value);
    }
    tracing::info!(user_id = viewer.user.user_id, "User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}
