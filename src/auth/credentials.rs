//! Durable credential storage with expiry-based invalidation.
//!
//! Persists three keys — `token`, `user` (JSON), `token_expires_at`
//! (string-encoded epoch milliseconds) — through a [`StorageBackend`].
//! Reads past the expiry clear all three keys and yield the logged-out
//! tuple. No operation here raises to its caller: malformed or
//! unreadable stored data degrades to "logged out" with a warning.

use std::sync::Arc;

use crate::model::UserRecord;
use crate::storage::StorageBackend;

/// Storage key for the session token.
const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user record.
const USER_KEY: &str = "user";

/// Storage key for the expiry timestamp (epoch ms, string-encoded).
const EXPIRY_KEY: &str = "token_expires_at";

/// Session lifetime with "remember me": 24 hours.
const REMEMBER_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Session lifetime without "remember me": 30 minutes.
const DEFAULT_TTL_MS: i64 = 30 * 60 * 1000;

/// The `{token, user, expiry}` triple representing a session.
///
/// Invariant: `user` is `Some` only when `token` is non-empty and the
/// tuple was read before its expiry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialTuple {
    pub token: String,
    pub user: Option<UserRecord>,
    /// Epoch milliseconds after which the tuple is invalid.
    pub expires_at: Option<i64>,
}

impl CredentialTuple {
    /// The logged-out tuple.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this tuple carries a live token.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Adapter between the session layer and durable storage.
pub struct CredentialStore {
    backend: Arc<dyn StorageBackend>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Read the persisted tuple, clearing it first if expired.
    pub fn read(&self) -> CredentialTuple {
        self.read_at(now_ms())
    }

    /// Persist a tuple. Expiry is `now` plus 24h (`remember`) or 30min.
    /// Returns the computed expiry timestamp.
    pub fn write(&self, token: &str, user: Option<&UserRecord>, remember: bool) -> i64 {
        self.write_at(token, user, remember, now_ms())
    }

    /// Overwrite only the persisted user record.
    ///
    /// Profile refreshes go through here: the expiry key is left
    /// untouched, so a profile fetch never extends the session.
    pub fn persist_user(&self, user: &UserRecord) {
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = self.backend.set(USER_KEY, &json) {
                    tracing::warn!("Failed to persist user record: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize user record: {e}"),
        }
    }

    /// Remove all three persisted keys.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY, EXPIRY_KEY] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(key, "Failed to clear credential key: {e}");
            }
        }
    }

    fn read_at(&self, now_ms: i64) -> CredentialTuple {
        let token = match self.backend.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return CredentialTuple::empty(),
            Err(e) => {
                tracing::warn!("Credential storage unreadable, treating as logged out: {e}");
                return CredentialTuple::empty();
            }
        };

        // Malformed expiry is treated as absent, not as an error.
        let expires_at = self
            .backend
            .get(EXPIRY_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse::<i64>().ok());

        if let Some(expiry) = expires_at {
            if now_ms > expiry {
                tracing::warn!("Stored session expired, clearing credentials");
                self.clear();
                return CredentialTuple::empty();
            }
        }

        // A user blob that fails schema validation yields `None`
        // without raising; the token alone still authenticates.
        let user = self
            .backend
            .get(USER_KEY)
            .ok()
            .flatten()
            .filter(|raw| raw.trim() != "null")
            .and_then(|raw| match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Malformed stored user record, ignoring: {e}");
                    None
                }
            });

        CredentialTuple {
            token,
            user,
            expires_at,
        }
    }

    fn write_at(
        &self,
        token: &str,
        user: Option<&UserRecord>,
        remember: bool,
        now_ms: i64,
    ) -> i64 {
        let ttl = if remember { REMEMBER_TTL_MS } else { DEFAULT_TTL_MS };
        let expires_at = now_ms + ttl;

        if let Err(e) = self.backend.set(TOKEN_KEY, token) {
            tracing::warn!("Failed to persist token: {e}");
        }
        let user_json = user
            .and_then(|u| serde_json::to_string(u).ok())
            .unwrap_or_else(|| "null".to_string());
        if let Err(e) = self.backend.set(USER_KEY, &user_json) {
            tracing::warn!("Failed to persist user record: {e}");
        }
        if let Err(e) = self.backend.set(EXPIRY_KEY, &expires_at.to_string()) {
            tracing::warn!("Failed to persist expiry: {e}");
        }

        expires_at
    }
}

/// Current Unix epoch in milliseconds.
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ── Tests ────────────────────────────────────────────────────────
