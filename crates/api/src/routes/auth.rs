use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Account pages.
///
/// ```text
/// /register                  form (GET), create account (POST)
/// /login                     form (GET), start session (POST)
/// /logout                    end session (POST, requires session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}
