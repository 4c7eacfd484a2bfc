//! Session resolution middleware and the extractors built on it.
//!
//! - [`auth::resolve_session`] -- Attaches an [`auth::AuthContext`] to every request.
//! - [`auth::AuthUser`] -- Requires a session; rejects with a JSON 401.
//! - [`auth::PageUser`] -- Requires a session; rejects with the HTML error page.
//! - [`error_page::render_for_viewer`] -- Shows the viewer on HTML error pages.

pub mod auth;
pub mod error_page;
