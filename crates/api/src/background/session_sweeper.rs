//! Periodic removal of expired sessions and read cache entries.
//!
//! Both are also dropped lazily when looked up; the sweep keeps entries that
//! are never looked up again from piling up.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::session::SessionStore;
use crate::gallery::GalleryService;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Remove expired sessions and cache entries once. Returns `(sessions, cache_entries)`.
pub fn sweep(sessions: &SessionStore, gallery: &GalleryService) -> (usize, usize) {
    (sessions.cleanup_expired(), gallery.cache().purge_expired())
}

/// Run the sweep loop every `every` until `cancel` is triggered.
pub async fn run(
    sessions: Arc<SessionStore>,
    gallery: Arc<GalleryService>,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Session sweeper started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let (expired_sessions, expired_entries) = sweep(&sessions, &gallery);
                if expired_sessions + expired_entries > 0 {
                    tracing::info!(expired_sessions, expired_entries, "Sweep: purged expired entries");
                } else {
                    tracing::debug!("Sweep: nothing to purge");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use captionary_core::cache::{keys, ReadCache};
    use captionary_db::MemoryStore;

    use super::*;
    use crate::auth::session::SessionUser;
    use crate::config::SessionConfig;
    use crate::gallery::CachedRead;

    fn parts(cache_ttl: Duration) -> (Arc<SessionStore>, Arc<GalleryService>) {
        let sessions = Arc::new(SessionStore::new(&SessionConfig {
            secret: "sweeper-secret".into(),
            ttl_hours: 1,
        }));
        let gallery = Arc::new(GalleryService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ReadCache::new(cache_ttl)),
            8,
        ));
        (sessions, gallery)
    }

    #[test]
    fn sweep_purges_expired_cache_entries_and_keeps_live_sessions() {
        let (sessions, gallery) = parts(Duration::ZERO);
        gallery
            .cache()
            .set(keys::IMAGES, CachedRead::Images(Arc::new(Vec::new())));
        let cookie = sessions.create(SessionUser {
            user_id: 1,
            user_name: "alice".into(),
        });

        assert_eq!(sweep(&sessions, &gallery), (0, 1));
        assert!(gallery.cache().is_empty());
        assert!(sessions.resolve(&cookie).is_some());
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let (sessions, gallery) = parts(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            sessions,
            gallery,
            Duration::from_millis(10),
            cancel.clone(),
        ));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop after cancel")
            .unwrap();
    }
}
