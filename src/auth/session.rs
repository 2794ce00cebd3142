//! In-memory session store over the credential adapter.
//!
//! Holds the current credential tuple behind a mutex, calls the backend
//! for auth and profile operations, and keeps durable storage in sync.
//! Side effects are confined to backend calls and the credential store;
//! redirect decisions live in the route guard.

use parking_lot::Mutex;
use serde_json::Value;

use crate::api::{ApiClient, AuthPayload, Envelope, LoginCredentials, RegisterData};
use crate::auth::credentials::{CredentialStore, CredentialTuple};
use crate::error::Result;
use crate::model::{UserRecord, VerificationStatus};

/// Reactive session state for one client context.
pub struct Session {
    api: ApiClient,
    store: CredentialStore,
    state: Mutex<CredentialTuple>,
}

impl Session {
    /// Build a session, restoring any persisted credentials.
    pub fn new(api: ApiClient, store: CredentialStore) -> Self {
        let initial = store.read();
        if initial.is_authenticated() {
            tracing::info!("Session restored from storage");
        }
        Self {
            api,
            store,
            state: Mutex::new(initial),
        }
    }

    // ── Derived state ────────────────────────────────────────

    /// Current token; empty when logged out.
    pub fn token(&self) -> String {
        self.state.lock().token.clone()
    }

    /// Current user record, if any.
    pub fn current_user(&self) -> Option<UserRecord> {
        self.state.lock().user.clone()
    }

    /// Whether a token is present.
    pub fn is_logged_in(&self) -> bool {
        self.state.lock().is_authenticated()
    }

    /// Whether the current user holds an admin or superadmin role.
    pub fn is_admin(&self) -> bool {
        self.state
            .lock()
            .user
            .as_ref()
            .is_some_and(|user| user.role.is_admin())
    }

    /// Whether the current user passed identity verification.
    pub fn is_verified(&self) -> bool {
        self.state
            .lock()
            .user
            .as_ref()
            .is_some_and(|user| user.verification_status == VerificationStatus::Verified)
    }

    // ── Operations ───────────────────────────────────────────

    /// Log in. On envelope code 200 the tuple is stored in memory and
    /// durable storage; the envelope is returned unconditionally so the
    /// caller can surface failure codes.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        remember: bool,
    ) -> Result<Envelope<AuthPayload>> {
        let envelope = self.api.login(credentials).await?;
        if envelope.is_ok() {
            if let Some(payload) = &envelope.data {
                self.adopt(payload, remember);
                tracing::info!(username = %credentials.username, "Logged in");
            }
        }
        Ok(envelope)
    }

    /// Register a new account. Same persistence pattern as `login`,
    /// with the short session lifetime.
    pub async fn register(&self, data: &RegisterData) -> Result<Envelope<AuthPayload>> {
        let envelope = self.api.register(data).await?;
        if envelope.is_ok() {
            if let Some(payload) = &envelope.data {
                self.adopt(payload, false);
                tracing::info!(username = %data.username, "Registered and logged in");
            }
        }
        Ok(envelope)
    }

    /// Log out: clear memory and storage. The backend logout call is
    /// best-effort — local state is cleared even when it fails.
    pub async fn logout(&self) {
        let token = self.token();
        if !token.is_empty() {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!("Backend logout failed, clearing locally anyway: {e}");
            }
        }
        *self.state.lock() = CredentialTuple::empty();
        self.store.clear();
        tracing::info!("Logged out");
    }

    /// Overwrite in-memory state from durable storage.
    ///
    /// Called at navigation time to pick up expiry and changes made by
    /// other tabs sharing the same storage.
    pub fn sync_from_storage(&self) {
        *self.state.lock() = self.store.read();
    }

    /// Refresh the user record from the backend.
    ///
    /// A no-op when logged out. On success the record is overwritten in
    /// memory and persisted; the expiry key is never refreshed.
    pub async fn fetch_profile(&self) -> Result<Option<Envelope<UserRecord>>> {
        let token = self.token();
        if token.is_empty() {
            return Ok(None);
        }

        let envelope = self.api.profile(&token).await?;
        if envelope.is_ok() {
            if let Some(user) = &envelope.data {
                self.store.persist_user(user);
                self.state.lock().user = Some(user.clone());
            }
        }
        Ok(Some(envelope))
    }

    /// Send a partial profile update. On success the patch fields are
    /// merged into the in-memory user and persisted; the expiry key is
    /// never refreshed.
    pub async fn update_profile(
        &self,
        patch: &serde_json::Map<String, Value>,
    ) -> Result<Envelope<Value>> {
        let token = self.token();
        let envelope = self.api.update_profile(&token, patch).await?;
        if envelope.is_ok() {
            let merged = {
                let mut state = self.state.lock();
                let merged = state.user.as_ref().map(|user| merge_patch(user, patch));
                if let Some(user) = &merged {
                    state.user = Some(user.clone());
                }
                merged
            };
            if let Some(user) = merged {
                self.store.persist_user(&user);
            }
        }
        Ok(envelope)
    }

    fn adopt(&self, payload: &AuthPayload, remember: bool) {
        let expires_at = self
            .store
            .write(&payload.token, payload.user.as_ref(), remember);
        let mut state = self.state.lock();
        state.token = payload.token.clone();
        state.user = payload.user.clone();
        state.expires_at = Some(expires_at);
    }
}

/// Merge wire-format patch fields over a user record.
///
/// Fields that fail schema validation after the merge leave the record
/// unchanged rather than erroring.
fn merge_patch(user: &UserRecord, patch: &serde_json::Map<String, Value>) -> UserRecord {
    let Ok(mut value) = serde_json::to_value(user) else {
        return user.clone();
    };
    if let Value::Object(fields) = &mut value {
        for (key, patch_value) in patch {
            fields.insert(key.clone(), patch_value.clone());
        }
    }
    serde_json::from_value(value).unwrap_or_else(|_| user.clone())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::model::Role;
    use crate::storage::{MemoryStorage, StorageBackend};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const THIRTY_MIN_MS: i64 = 30 * 60 * 1000;

    fn session_for(server_uri: &str, backend: Arc<MemoryStorage>) -> Session {
        let config = ClientConfig {
            base_url: server_uri.to_string(),
            timeout_secs: 5,
            storage_dir: std::env::temp_dir(),
        };
        let api = ApiClient::new(&config).unwrap();
        Session::new(api, CredentialStore::new(backend))
    }

    async fn mount_login(server: &MockServer, user: Value) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": {"token": "tok-1", "user": user}
            })))
            .mount(server)
            .await;
    }

    fn driver_credentials() -> LoginCredentials {
        LoginCredentials {
            username: "driver".into(),
            password: "hunter22".into(),
        }
    }

    #[tokio::test]
    async fn login_success_updates_memory_and_storage() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver", "role": "user"})).await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());

        let envelope = session.login(&driver_credentials(), false).await.unwrap();
        assert!(envelope.is_ok());
        assert!(session.is_logged_in());
        assert!(!session.is_admin());
        assert_eq!(session.token(), "tok-1");
        assert_eq!(backend.get("token").unwrap().as_deref(), Some("tok-1"));
        assert!(backend.get("user").unwrap().unwrap().contains("driver"));
        assert!(backend.get("token_expires_at").unwrap().is_some());
    }

    #[tokio::test]
    async fn login_failure_code_leaves_state_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 401,
                "message": "Invalid username or password"
            })))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());

        let envelope = session.login(&driver_credentials(), false).await.unwrap();
        assert_eq!(envelope.code, 401);
        assert!(!session.is_logged_in());
        assert_eq!(backend.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn login_network_failure_propagates() {
        let backend = Arc::new(MemoryStorage::new());
        let session = session_for("http://127.0.0.1:1", backend);
        assert!(session.login(&driver_credentials(), false).await.is_err());
    }

    #[tokio::test]
    async fn remember_flag_selects_long_expiry() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver"})).await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());
        let before = chrono::Utc::now().timestamp_millis();

        session.login(&driver_credentials(), true).await.unwrap();

        let expiry: i64 = backend
            .get("token_expires_at")
            .unwrap()
            .unwrap()
            .parse()
            .unwrap();
        assert!(expiry > before + THIRTY_MIN_MS);
    }

    #[tokio::test]
    async fn register_success_logs_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": {"token": "tok-new", "user": {"id": 9, "username": "newbie"}}
            })))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend);
        let data = RegisterData {
            username: "newbie".into(),
            password: "hunter22".into(),
            phone: "5550100".into(),
            email: None,
        };

        let envelope = session.register(&data).await.unwrap();
        assert!(envelope.is_ok());
        assert!(session.is_logged_in());
        assert_eq!(session.current_user().unwrap().username, "newbie");
    }

    #[tokio::test]
    async fn logout_clears_even_when_backend_fails() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver"})).await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());
        session.login(&driver_credentials(), false).await.unwrap();

        session.logout().await;
        assert!(!session.is_logged_in());
        assert_eq!(backend.get("token").unwrap(), None);
        assert_eq!(backend.get("user").unwrap(), None);
        assert_eq!(backend.get("token_expires_at").unwrap(), None);
    }

    #[tokio::test]
    async fn session_restores_from_storage_on_construction() {
        let backend = Arc::new(MemoryStorage::new());
        let store = CredentialStore::new(backend.clone());
        let user = UserRecord {
            id: 3,
            username: "returning".into(),
            ..UserRecord::default()
        };
        store.write("tok-persisted", Some(&user), true);

        let session = session_for("http://127.0.0.1:1", backend);
        assert!(session.is_logged_in());
        assert_eq!(session.current_user().unwrap().username, "returning");
    }

    #[tokio::test]
    async fn sync_observes_other_tab_logout_lazily() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver"})).await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let tab_a = session_for(&server.uri(), backend.clone());
        tab_a.login(&driver_credentials(), false).await.unwrap();

        let tab_b = session_for(&server.uri(), backend);
        assert!(tab_b.is_logged_in());

        tab_a.logout().await;
        // Tab B is stale until it syncs — accepted staleness window.
        assert!(tab_b.is_logged_in());
        tab_b.sync_from_storage();
        assert!(!tab_b.is_logged_in());
    }

    #[tokio::test]
    async fn fetch_profile_is_noop_when_logged_out() {
        let backend = Arc::new(MemoryStorage::new());
        let session = session_for("http://127.0.0.1:1", backend);
        let result = session.fetch_profile().await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn fetch_profile_overwrites_user_without_touching_expiry() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver"})).await;
        Mock::given(method("GET"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": {"id": 1, "username": "driver", "verificationStatus": 2}
            })))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());
        session.login(&driver_credentials(), false).await.unwrap();
        let expiry_before = backend.get("token_expires_at").unwrap();

        let envelope = session.fetch_profile().await.unwrap().unwrap();
        assert!(envelope.is_ok());
        assert!(session.is_verified());
        assert_eq!(backend.get("token_expires_at").unwrap(), expiry_before);
        assert!(backend.get("user").unwrap().unwrap().contains("\"verificationStatus\":2"));
    }

    #[tokio::test]
    async fn update_profile_merges_patch_and_persists() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver-y"})).await;
        Mock::given(method("POST"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());
        session.login(&driver_credentials(), false).await.unwrap();

        let patch = json!({"username": "driver-x"});
        let patch = patch.as_object().unwrap();
        let envelope = session.update_profile(patch).await.unwrap();
        assert!(envelope.is_ok());

        let user = session.current_user().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "driver-x");
        assert!(backend.get("user").unwrap().unwrap().contains("driver-x"));
    }

    #[tokio::test]
    async fn update_profile_without_user_record_persists_nothing() {
        let server = MockServer::start().await;
        // Token present but no user blob — e.g. the stored record was
        // malformed and read back as None.
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": {"token": "tok-1"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend.clone());
        session.login(&driver_credentials(), false).await.unwrap();
        assert!(session.current_user().is_none());

        let patch = json!({"username": "driver-x"});
        let envelope = session
            .update_profile(patch.as_object().unwrap())
            .await
            .unwrap();
        assert!(envelope.is_ok());
        assert!(session.current_user().is_none());
        assert_eq!(backend.get("user").unwrap().as_deref(), Some("null"));
    }

    #[tokio::test]
    async fn update_profile_failure_code_does_not_merge() {
        let server = MockServer::start().await;
        mount_login(&server, json!({"id": 1, "username": "driver-y"})).await;
        Mock::given(method("POST"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 400,
                "message": "Phone number already in use"
            })))
            .mount(&server)
            .await;

        let backend = Arc::new(MemoryStorage::new());
        let session = session_for(&server.uri(), backend);
        session.login(&driver_credentials(), false).await.unwrap();

        let patch = json!({"username": "driver-x"});
        let envelope = session
            .update_profile(patch.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(envelope.code, 400);
        assert_eq!(session.current_user().unwrap().username, "driver-y");
    }

    #[tokio::test]
    async fn admin_and_verified_predicates() {
        let backend = Arc::new(MemoryStorage::new());
        let store = CredentialStore::new(backend.clone());
        let user = UserRecord {
            id: 2,
            username: "fleet-admin".into(),
            role: Role::Admin,
            verification_status: crate::model::VerificationStatus::Verified,
            ..UserRecord::default()
        };
        store.write("tok-admin", Some(&user), true);

        let session = session_for("http://127.0.0.1:1", backend);
        assert!(session.is_admin());
        assert!(session.is_verified());
    }

    #[test]
    fn merge_patch_overwrites_only_named_fields() {
        let user = UserRecord {
            id: 1,
            username: "driver-y".into(),
            phone: Some("5550100".into()),
            ..UserRecord::default()
        };
        let patch = json!({"username": "driver-x"});
        let merged = merge_patch(&user, patch.as_object().unwrap());
        assert_eq!(merged.id, 1);
        assert_eq!(merged.username, "driver-x");
        assert_eq!(merged.phone.as_deref(), Some("5550100"));
    }

    #[test]
    fn merge_patch_with_invalid_value_keeps_original() {
        let user = UserRecord {
            id: 1,
            username: "driver".into(),
            ..UserRecord::default()
        };
        // `id` must be an integer; a string patch fails validation.
        let patch = json!({"id": "not-a-number"});
        let merged = merge_patch(&user, patch.as_object().unwrap());
        assert_eq!(merged, user);
    }
}
