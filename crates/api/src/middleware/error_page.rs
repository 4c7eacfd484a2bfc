//! Error pages for signed-in viewers.
//!
//! [`PageError`](crate::error::PageError) renders without knowing who is
//! asking. This layer sits inside [`resolve_session`](super::auth::resolve_session)
//! and re-renders those pages with the viewer's name in the header.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::auth::AuthContext;
use crate::error::PageFailure;

pub async fn render_for_viewer(request: Request, next: Next) -> Response {
    let viewer = request
        .extensions()
        .get::<AuthContext>()
        .and_then(AuthContext::viewer);

    let mut response = next.run(request).await;
    let Some(viewer) = viewer else {
        return response;
    };
    match response.extensions_mut().remove::<PageFailure>() {
        Some(failure) => failure.render(Some(viewer)),
        None => response,
    }
}
