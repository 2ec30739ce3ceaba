use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// A session freshly issued for a logged-in user. The `token` goes to the
/// client cookie; only its hash stays server-side.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub remember: bool,
}

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: Uuid,
    expires_at: OffsetDateTime,
}

/// In-process store mapping hashed session tokens to authenticated users.
///
/// One entry per browser session: issued on login, removed on logout or
/// expiry. Entries do not survive a restart; the credential store remains
/// the only persistent authority.
pub struct SessionStore {
    ttl: Duration,
    remember_ttl: Duration,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            ttl: Duration::hours(config.ttl_hours),
            remember_ttl: Duration::days(config.remember_ttl_days),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for `user_id` and hand back the plaintext token.
    /// The write also sweeps out entries whose expiry has passed, so tokens
    /// that are never presented again still get dropped.
    pub fn issue(&self, user_id: Uuid, remember: bool) -> IssuedSession {
        let token = generate_token();
        let ttl = if remember { self.remember_ttl } else { self.ttl };
        let now = OffsetDateTime::now_utc();
        let expires_at = now + ttl;
        {
            let mut sessions = self.sessions.write();
            sessions.retain(|_, record| record.expires_at > now);
            sessions.insert(
                hash_token(&token),
                SessionRecord {
                    user_id,
                    expires_at,
                },
            );
        }
        tracing::debug!(%user_id, remember, "session issued");
        IssuedSession {
            token,
            expires_at,
            remember,
        }
    }

    /// Resolve a cookie token to the authenticated user, pruning the entry
    /// if it has expired.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        let key = hash_token(token);
        let now = OffsetDateTime::now_utc();
        let mut expired = false;
        let resolved = {
            let sessions = self.sessions.read();
            match sessions.get(&key) {
                Some(record) if record.expires_at > now => Some(record.user_id),
                Some(_) => {
                    expired = true;
                    None
                }
                None => None,
            }
        };
        if expired {
            self.sessions.write().remove(&key);
        }
        resolved
    }

    /// Drop the session for `token`. Returns whether an entry was removed.
    pub fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.write().remove(&hash_token(token));
        if let Some(record) = &removed {
            tracing::debug!(user_id = %record.user_id, "session revoked");
        }
        removed.is_some()
    }
}

fn generate_token() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
