use std::sync::Arc;

use crate::auth::session::SessionStore;
use crate::config::ServerConfig;
use crate::gallery::GalleryService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Gallery reads and writes, including the read cache.
    pub gallery: Arc<GalleryService>,
    /// Login sessions referenced by the session cookie.
    pub sessions: Arc<SessionStore>,
    pub config: Arc<ServerConfig>,
}
