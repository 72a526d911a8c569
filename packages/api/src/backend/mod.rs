//! # Hosted backend client
//!
//! [`Backend`] is the one handle every page and provider talks through. It wraps the
//! public HTTP and WebSocket APIs of the hosted Backend-as-a-Service:
//!
//! | Module | Service | Base path |
//! |--------|---------|-----------|
//! | [`auth`] | email/password auth, recovery, user updates | `/auth/v1` |
//! | [`query`] | table reads/writes and RPC | `/rest/v1` |
//! | [`storage`] | public object buckets | `/storage/v1` |
//! | [`realtime`] | row-change subscriptions over Phoenix channels | `/realtime/v1/websocket` |
//!
//! The handle is `Clone` and cheap to copy into async tasks. It carries the access
//! token of the signed-in user; requests fall back to the anon key when signed out.

use std::sync::{Arc, RwLock};

use reqwest::{Method, RequestBuilder, Response};

use crate::config::BackendConfig;
use crate::error::{self, Result};

pub mod auth;
pub mod query;
pub mod realtime;
pub mod storage;

/// Shared client for the hosted backend.
#[derive(Clone)]
pub struct Backend {
    inner: Arc<Inner>,
}

struct Inner {
    config: BackendConfig,
    http: reqwest::Client,
    access_token: RwLock<Option<String>>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("url", &self.inner.config.url)
            .field("signed_in", &self.access_token().is_some())
            .finish()
    }
}

impl PartialEq for Backend {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                http: reqwest::Client::new(),
                access_token: RwLock::new(None),
            }),
        }
    }

    /// Build a client from [`BackendConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(BackendConfig::from_env()?))
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Current user access token, if signed in.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .access_token
            .read()
            .map(|token| token.clone())
            .unwrap_or_default()
    }

    /// Replace the access token used for subsequent requests.
    pub fn set_access_token(&self, token: Option<String>) {
        match self.inner.access_token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn bearer(&self) -> String {
        self.access_token()
            .unwrap_or_else(|| self.inner.config.anon_key.clone())
    }

    /// Absolute URL for a path below the backend's base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.config.url,
            path.trim_start_matches('/')
        )
    }

    /// Start a request carrying the API key and bearer token.
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    /// Send a request, turning non-success statuses into [`crate::BackendError`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = error::from_status(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), "backend request failed: {err}");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> Backend {
        Backend::new(BackendConfig::new("https://demo.supabase.co/", "anon-key"))
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let backend = backend();
        assert_eq!(
            backend.endpoint("/rest/v1/events"),
            "https://demo.supabase.co/rest/v1/events"
        );
        assert_eq!(
            backend.endpoint("auth/v1/user"),
            "https://demo.supabase.co/auth/v1/user"
        );
    }

    #[test]
    fn test_bearer_falls_back_to_anon_key() {
        let backend = backend();
        assert_eq!(backend.bearer(), "anon-key");

        backend.set_access_token(Some("jwt".to_string()));
        assert_eq!(backend.bearer(), "jwt");
        assert_eq!(backend.clone().access_token().as_deref(), Some("jwt"));

        backend.set_access_token(None);
        assert_eq!(backend.bearer(), "anon-key");
    }
}
