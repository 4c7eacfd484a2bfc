//! Cookie session authentication.
//!
//! [`resolve_session`] runs once per request, looks up the session cookie and
//! stores the outcome as an [`AuthContext`] request extension. Handlers read
//! it through the extractors below; none of them consult the request body,
//! so a client-supplied user id can never stand in for the session.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use captionary_core::types::DbId;

use crate::auth::session::{SessionUser, SESSION_COOKIE};
use crate::error::{AppError, PageError};
use crate::state::AppState;

const LOGIN_REQUIRED: &str = "You must be logged in to do that";

/// The session outcome for the current request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user: Option<SessionUser>,
    /// Raw cookie value, kept so logout can destroy the session.
    pub(crate) cookie: Option<String>,
}

impl AuthContext {
    pub fn require(&self) -> Result<&SessionUser, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::unauthorized(LOGIN_REQUIRED))
    }

    /// User name of the logged-in viewer, for page headers.
    pub fn viewer(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.user_name.clone())
    }
}

/// Resolve the session cookie into an [`AuthContext`] extension.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let cookie = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let user = cookie.as_deref().and_then(|value| state.sessions.resolve(value));

    if let Some(user) = &user {
        tracing::debug!(user_id = user.user_id, "Session resolved");
    }

    request.extensions_mut().insert(AuthContext { user, cookie });
    next.run(request).await
}

/// Reads the [`AuthContext`] left by [`resolve_session`]; anonymous if absent.
impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(context_of(parts))
    }
}

fn context_of(parts: &Parts) -> AuthContext {
    parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_default()
}

/// Authenticated user for JSON endpoints.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub user_name: String,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = context_of(parts);
        let user = context.require()?;
        Ok(AuthUser {
            user_id: user.user_id,
            user_name: user.user_name.clone(),
        })
    }
}

/// Authenticated user for HTML endpoints; rejects with the error page.
#[derive(Debug, Clone)]
pub struct PageUser {
    pub user: SessionUser,
    pub(crate) cookie: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for PageUser {
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = context_of(parts);
        let user = context.require()?.clone();
        Ok(PageUser {
            user,
            cookie: context.cookie,
        })
    }
}
