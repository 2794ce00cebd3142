//! Typed HTTP bindings for the rental backend.
//!
//! Every endpoint answers the same envelope: `{code, data, message}`,
//! where `code == 200` means the operation succeeded. A non-200 code in
//! a 2xx response is application data and is handed back to the caller
//! untouched; only transport failures and non-success HTTP statuses
//! become errors.
//!
//! Authenticated endpoints take the bearer token explicitly — the
//! client holds no session state of its own.

pub mod rental;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::model::UserRecord;

/// Envelope `code` signaling success.
pub const CODE_OK: i64 = 200;

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Application status code; 200 on success.
    pub code: i64,
    /// Payload, present on success.
    pub data: Option<T>,
    /// Human-readable message, usually present on failure.
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Whether the application-level code signals success.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

// ── Auth request/response shapes ─────────────────────────────────

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Fields for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterData {
    pub username: String,
    pub password: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload of a successful login or register: `{token, user}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

// ── Client ───────────────────────────────────────────────────────

/// HTTP client over the rental backend REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        self.with_auth(self.http.get(self.url(path)), token)
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> reqwest::RequestBuilder {
        self.with_auth(self.http.post(self.url(path)).json(body), token)
    }

    fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> reqwest::RequestBuilder {
        self.with_auth(self.http.put(self.url(path)).json(body), token)
    }

    fn delete(&self, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        self.with_auth(self.http.delete(self.url(path)), token)
    }

    fn with_auth(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode the response envelope.
    ///
    /// Non-success HTTP statuses become [`Error::Http`], recovering the
    /// envelope message from the body when it parses.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    // ── Auth endpoints ───────────────────────────────────────

    /// `POST /auth/login`.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Envelope<AuthPayload>> {
        self.execute(self.post("/auth/login", None, credentials)).await
    }

    /// `POST /auth/register`.
    pub async fn register(&self, data: &RegisterData) -> Result<Envelope<AuthPayload>> {
        self.execute(self.post("/auth/register", None, data)).await
    }

    /// `POST /auth/logout`. Best-effort server-side session teardown.
    pub async fn logout(&self, token: &str) -> Result<Envelope<serde_json::Value>> {
        self.execute(self.post("/auth/logout", Some(token), &serde_json::json!({})))
            .await
    }

    /// `GET /auth/check`. Validates a token against the live session.
    pub async fn check_session(&self, token: &str) -> Result<Envelope<UserRecord>> {
        self.execute(self.get("/auth/check", Some(token))).await
    }

    // ── Profile endpoints ────────────────────────────────────

    /// `GET /user/profile`.
    pub async fn profile(&self, token: &str) -> Result<Envelope<UserRecord>> {
        self.execute(self.get("/user/profile", Some(token))).await
    }

    /// `POST /user/profile` with a partial field patch.
    pub async fn update_profile(
        &self,
        token: &str,
        patch: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Envelope<serde_json::Value>> {
        self.execute(self.post("/user/profile", Some(token), patch)).await
    }
}

// ── Tests ────────────────────────────────────────────────────────
