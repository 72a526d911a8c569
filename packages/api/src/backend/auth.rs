//! Email/password authentication against the backend's auth service.
//!
//! Successful sign-in and refresh install the new access token on the
//! [`Backend`] handle; sign-out clears it.

use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::Backend;
use crate::error::Result;

/// Seconds before the real expiry at which a session counts as expired.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// The auth service's view of a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    /// Name given at sign-up, if any.
    pub fn metadata_name(&self) -> Option<&str> {
        self.user_metadata.get("name").and_then(|v| v.as_str())
    }
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// Unix timestamp (seconds) at which the access token expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub token_type: String,
    pub user: AuthUser,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the service omitted it.
    fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some((now + Duration::seconds(self.expires_in)).timestamp());
        }
        self
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Whether the access token is expired or about to expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(ts) => now.timestamp() + EXPIRY_LEEWAY_SECS >= ts,
            None => false,
        }
    }
}

/// Outcome of a sign-up: either an immediate session, or an account that must be
/// confirmed by email first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUp {
    Session(Session),
    ConfirmationPending(AuthUser),
}

/// Fields accepted by [`Backend::update_user`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Tokens delivered in the URL fragment of an auth email link
/// (`#access_token=...&refresh_token=...&type=recovery`).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub kind: Option<String>,
}

/// Raw fragment pairs; unknown keys such as `expires_in` are ignored.
#[derive(Deserialize)]
struct LinkFragment {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl LinkTokens {
    /// Parse the fragment part of a redirect URL. Accepts it with or without `#`.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let raw: LinkFragment = serde_urlencoded::from_str(fragment.trim_start_matches('#')).ok()?;
        let present = |v: Option<String>| v.filter(|v| !v.is_empty());
        Some(Self {
            access_token: present(raw.access_token)?,
            refresh_token: present(raw.refresh_token),
            kind: present(raw.kind),
        })
    }

    pub fn is_recovery(&self) -> bool {
        self.kind.as_deref() == Some("recovery")
    }
}

impl Backend {
    /// Create an account. The display name is stored in the user metadata.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<SignUp> {
        let url = self.endpoint("auth/v1/signup");
        let body = json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });
        let response = self
            .send(self.request(Method::POST, &url).json(&body))
            .await?;
        let outcome = match response.json::<SignUp>().await? {
            SignUp::Session(session) => {
                let session = session.stamped(Utc::now());
                self.set_access_token(Some(session.access_token.clone()));
                SignUp::Session(session)
            }
            pending => pending,
        };
        tracing::info!("signed up {email}");
        Ok(outcome)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.endpoint("auth/v1/token?grant_type=password");
        let body = json!({ "email": email, "password": password });
        self.token_request(&url, &body).await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let url = self.endpoint("auth/v1/token?grant_type=refresh_token");
        let body = json!({ "refresh_token": refresh_token });
        self.token_request(&url, &body).await
    }

    async fn token_request(&self, url: &str, body: &serde_json::Value) -> Result<Session> {
        // Token grants must not carry a stale user token.
        let request = self
            .inner
            .http
            .post(url)
            .header("apikey", &self.inner.config.anon_key)
            .json(body);
        let session = self
            .send(request)
            .await?
            .json::<Session>()
            .await?
            .stamped(Utc::now());
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    /// Send a password-recovery email whose link lands on `redirect_to`.
    pub async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        let url = format!(
            "{}?redirect_to={}",
            self.endpoint("auth/v1/recover"),
            urlencoding::encode(redirect_to)
        );
        self.send(
            self.request(Method::POST, &url)
                .json(&json!({ "email": email })),
        )
        .await?;
        Ok(())
    }

    /// Change the signed-in user's email and/or password.
    pub async fn update_user(&self, attributes: &UserAttributes) -> Result<AuthUser> {
        let url = self.endpoint("auth/v1/user");
        Ok(self
            .send(self.request(Method::PUT, &url).json(attributes))
            .await?
            .json()
            .await?)
    }

    /// Fetch the user the current access token belongs to.
    pub async fn get_user(&self) -> Result<AuthUser> {
        let url = self.endpoint("auth/v1/user");
        Ok(self
            .send(self.request(Method::GET, &url))
            .await?
            .json()
            .await?)
    }

    /// Revoke the session server-side and forget the token locally.
    pub async fn sign_out(&self) -> Result<()> {
        let url = self.endpoint("auth/v1/logout");
        let result = self.send(self.request(Method::POST, &url)).await;
        self.set_access_token(None);
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_json(expires_at: Option<i64>) -> serde_json::Value {
        let mut value = json!({
            "access_token": "jwt",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
                "email": "ana@example.com",
                "user_metadata": { "name": "Ana" },
                "created_at": "2024-05-01T12:00:00Z"
            }
        });
        if let Some(ts) = expires_at {
            value["expires_at"] = json!(ts);
        }
        value
    }

    #[test]
    fn test_session_expiry_with_leeway() {
        let session: Session = serde_json::from_value(session_json(Some(1_000_000))).unwrap();
        let at = |ts: i64| Utc.timestamp_opt(ts, 0).unwrap();

        assert!(!session.is_expired(at(1_000_000 - 61)));
        assert!(session.is_expired(at(1_000_000 - 60)));
        assert!(session.is_expired(at(1_000_001)));
    }

    #[test]
    fn test_stamped_fills_missing_expiry() {
        let session: Session = serde_json::from_value(session_json(None)).unwrap();
        assert!(session.expires_at().is_none());

        let now = Utc.timestamp_opt(2_000_000, 0).unwrap();
        let stamped = session.stamped(now);
        assert_eq!(stamped.expires_at, Some(2_003_600));
        assert_eq!(stamped.user.metadata_name(), Some("Ana"));
    }

    #[test]
    fn test_sign_up_outcomes() {
        let immediate: SignUp = serde_json::from_value(session_json(Some(1))).unwrap();
        assert!(matches!(immediate, SignUp::Session(_)));

        let pending: SignUp = serde_json::from_value(json!({
            "id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
            "email": "ana@example.com",
            "confirmation_sent_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert!(matches!(pending, SignUp::ConfirmationPending(ref u) if u.email.as_deref() == Some("ana@example.com")));
    }

    #[test]
    fn test_link_tokens_from_fragment() {
        let tokens =
            LinkTokens::from_fragment("#access_token=abc&expires_in=3600&refresh_token=def&type=recovery")
                .unwrap();
        assert_eq!(tokens.access_token, "abc");
        assert_eq!(tokens.refresh_token.as_deref(), Some("def"));
        assert!(tokens.is_recovery());

        assert!(LinkTokens::from_fragment("type=recovery").is_none());
        assert!(LinkTokens::from_fragment("").is_none());
        assert!(LinkTokens::from_fragment("access_token=&type=signup").is_none());
    }

    #[test]
    fn test_link_tokens_are_percent_decoded() {
        let tokens = LinkTokens::from_fragment("access_token=a%2Bb%3D&refresh_token=r+1").unwrap();
        assert_eq!(tokens.access_token, "a+b=");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r 1"));
        assert_eq!(tokens.kind, None);
    }

    #[test]
    fn test_user_attributes_skip_unset_fields() {
        let attrs = UserAttributes {
            password: Some("segredo123".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({ "password": "segredo123" })
        );
    }
}
