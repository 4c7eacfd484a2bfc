//! Server-side login sessions carried by a signed cookie.
//!
//! The cookie value is `<token>.<hmac>`: an opaque random token plus its
//! HMAC-SHA256 signature under `SESSION_SECRET`. Only the SHA-256 digest of
//! the token is kept server-side, so the session table alone cannot be
//! replayed as cookies.

use std::collections::HashMap;
use std::sync::RwLock;

use captionary_core::lock::{rw_read, rw_write};
use captionary_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "captionary_sid";

/// Longest session lifetime accepted: one year. Longer values are clamped.
pub const MAX_TTL_HOURS: i64 = 24 * 365;

const TARGET: &str = "session";

type HmacSha256 = Hmac<Sha256>;

/// The authenticated identity a session resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: DbId,
    pub user_name: String,
}

#[derive(Debug)]
struct SessionRecord {
    user: SessionUser,
    expires_at: Timestamp,
}

/// In-process session table keyed by token digest.
pub struct SessionStore {
    secret: String,
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl: Duration::hours(config.ttl_hours.clamp(1, MAX_TTL_HOURS)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session for `user` and return the cookie value.
    pub fn create(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let record = SessionRecord {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        rw_write(&self.sessions, TARGET, "create").insert(digest(&token), record);

        format!("{token}.{}", self.sign(&token))
    }

    /// Resolve a cookie value to its user.
    ///
    /// Returns `None` for malformed or tampered values, unknown tokens, and
    /// expired sessions (which are dropped on the way out).
    pub fn resolve(&self, cookie_value: &str) -> Option<SessionUser> {
        let token = self.verified_token(cookie_value)?;
        let key = digest(token);

        {
            let sessions = rw_read(&self.sessions, TARGET, "resolve");
            let record = sessions.get(&key)?;
            if record.expires_at > Utc::now() {
                return Some(record.user.clone());
            }
        }

        rw_write(&self.sessions, TARGET, "resolve.evict").remove(&key);
        tracing::debug!("Dropped expired session");
        None
    }

    /// End the session behind `cookie_value`. Returns whether one existed.
    pub fn destroy(&self, cookie_value: &str) -> bool {
        let Some(token) = self.verified_token(cookie_value) else {
            return false;
        };
        rw_write(&self.sessions, TARGET, "destroy")
            .remove(&digest(token))
            .is_some()
    }

    /// Remove every expired session, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = rw_write(&self.sessions, TARGET, "cleanup_expired");
        let before = sessions.len();
        sessions.retain(|_, record| record.expires_at > now);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        rw_read(&self.sessions, TARGET, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mac(&self, token: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        mac
    }

    fn sign(&self, token: &str) -> String {
        hex::encode(self.mac(token).finalize().into_bytes())
    }

    /// Split `<token>.<hmac>` and check the signature in constant time.
    fn verified_token<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (token, signature) = cookie_value.split_once('.')?;
        if token.is_empty() {
            return None;
        }
        let signature = hex::decode(signature).ok()?;
        self.mac(token).verify_slice(&signature).ok()?;
        Some(token)
    }

    #[cfg(test)]
    fn force_expire_all(&self) {
        let past = Utc::now() - Duration::seconds(1);
        for record in self.sessions.write().unwrap().values_mut() {
            record.expires_at = past;
        }
    }
}

/// SHA-256 hex digest of a session token.
fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
