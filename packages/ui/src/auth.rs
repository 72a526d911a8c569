//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] restores the persisted session on start, refreshes the access
//! token before it expires, and keeps the signed-in user's profile at hand. Pages
//! call [`establish_session`] after a successful sign-in or sign-up and
//! [`sign_out`] to leave.

use std::time::Duration;

use api::models::Profile;
use api::services::profiles;
use api::{Backend, BackendError, Session};
use chrono::Utc;
use dioxus::prelude::*;
use uuid::Uuid;

use crate::components::{use_toast, Button, ButtonVariant, ToastOptions};
use crate::{clear_drafts, session_slot, use_backend};

/// How often the provider checks whether the token needs refreshing.
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// A token expiring within this window is refreshed ahead of time.
const REFRESH_AHEAD_SECS: i64 = 5 * 60;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    /// The persisted session is still being restored.
    pub loading: bool,
    /// Sign-out has started; a background refresh must not bring the session back.
    pub signing_out: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            profile: None,
            loading: true,
            signing_out: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    SignedIn,
    SignedOut,
}

impl AuthState {
    fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }

    pub fn status(&self) -> AuthStatus {
        match (self.loading, &self.session) {
            (true, _) => AuthStatus::Loading,
            (false, Some(_)) => AuthStatus::SignedIn,
            (false, None) => AuthStatus::SignedOut,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.user.id)
    }

    pub fn email(&self) -> Option<&str> {
        self.session.as_ref()?.user.email.as_deref()
    }

    pub fn display_name(&self) -> String {
        if let Some(profile) = &self.profile {
            return profile.display_name().to_string();
        }
        self.session
            .as_ref()
            .and_then(|s| s.user.metadata_name().map(str::to_string))
            .unwrap_or_else(|| "Usuário".to_string())
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Fetch the user's profile, creating the row on first sign-in.
async fn load_profile(backend: &Backend, session: &Session, name: &str) -> Result<Profile, BackendError> {
    match profiles::get(backend, session.user.id).await {
        Ok(profile) => Ok(profile),
        Err(BackendError::NotFound) => profiles::create_for(backend, &session.user, name).await,
        Err(e) => Err(e),
    }
}

/// A refresh started for `refreshed` may only be adopted while the same user is
/// still signed in.
fn still_signed_in_as(state: &AuthState, refreshed: &Session) -> bool {
    !state.signing_out
        && state
            .session
            .as_ref()
            .is_some_and(|s| s.user.id == refreshed.user.id)
}

/// Restore the persisted session, refreshing it when it has expired.
async fn restore(backend: &Backend) -> AuthState {
    let slot = session_slot();
    let stored = match slot.load().await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("could not read stored session: {e}");
            None
        }
    };
    let Some(mut session) = stored else {
        return AuthState::signed_out();
    };

    if session.is_expired(Utc::now()) {
        match backend.refresh_session(&session.refresh_token).await {
            Ok(fresh) => {
                session = fresh;
                if let Err(e) = slot.save(&session).await {
                    tracing::warn!("could not persist refreshed session: {e}");
                }
            }
            Err(e) => {
                tracing::info!("stored session could not be refreshed: {e}");
                let _ = slot.clear().await;
                return AuthState::signed_out();
            }
        }
    } else {
        backend.set_access_token(Some(session.access_token.clone()));
    }

    let profile = match load_profile(backend, &session, "").await {
        Ok(profile) => Some(profile),
        Err(BackendError::Unauthorized(e)) => {
            tracing::info!("stored session rejected: {e}");
            backend.set_access_token(None);
            let _ = slot.clear().await;
            return AuthState::signed_out();
        }
        Err(e) => {
            tracing::error!("failed to load profile: {e}");
            None
        }
    };
    tracing::info!(user = %session.user.id, "session restored");
    AuthState {
        session: Some(session),
        profile,
        loading: false,
        signing_out: false,
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component (inside `BackendProvider`).
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_backend();
    let mut auth_state = use_signal(AuthState::default);

    // Restore the persisted session on mount
    let restore_backend = backend.clone();
    let _ = use_resource(move || {
        let backend = restore_backend.clone();
        async move {
            let state = restore(&backend).await;
            auth_state.set(state);
        }
    });

    // Refresh the access token ahead of its expiry
    use_effect(move || {
        let backend = backend.clone();
        spawn(async move {
            loop {
                crate::sleep(REFRESH_CHECK_INTERVAL).await;

                let Some(session) = auth_state.peek().session.clone() else {
                    continue;
                };
                let soon = Utc::now() + chrono::Duration::seconds(REFRESH_AHEAD_SECS);
                if !session.is_expired(soon) {
                    continue;
                }
                match backend.refresh_session(&session.refresh_token).await {
                    Ok(fresh) => {
                        if !still_signed_in_as(&auth_state.peek(), &session) {
                            tracing::debug!("discarding session refreshed after sign-out");
                            if let Err(e) = backend.sign_out().await {
                                tracing::warn!("could not revoke discarded session: {e}");
                            }
                            // Hand the client back to whoever is signed in now
                            let current = auth_state.peek();
                            let token = current
                                .session
                                .as_ref()
                                .filter(|_| !current.signing_out)
                                .map(|s| s.access_token.clone());
                            backend.set_access_token(token);
                            continue;
                        }
                        if let Err(e) = session_slot().save(&fresh).await {
                            tracing::warn!("could not persist refreshed session: {e}");
                        }
                        auth_state.write().session = Some(fresh);
                        tracing::debug!("access token refreshed");
                    }
                    Err(BackendError::Unauthorized(e)) => {
                        tracing::warn!("session revoked: {e}");
                        backend.set_access_token(None);
                        let _ = session_slot().clear().await;
                        auth_state.set(AuthState::signed_out());
                    }
                    Err(e) => tracing::warn!("token refresh failed, will retry: {e}"),
                }
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Adopt a freshly issued session: persist it and load the profile.
///
/// `name` seeds the profile row when this is the account's first sign-in.
pub async fn establish_session(
    mut auth: Signal<AuthState>,
    backend: &Backend,
    session: Session,
    name: &str,
) -> Result<(), BackendError> {
    backend.set_access_token(Some(session.access_token.clone()));
    if let Err(e) = session_slot().save(&session).await {
        tracing::warn!("could not persist session: {e}");
    }
    let profile = load_profile(backend, &session, name).await?;
    tracing::info!(user = %session.user.id, "signed in");
    auth.set(AuthState {
        session: Some(session),
        profile: Some(profile),
        loading: false,
        signing_out: false,
    });
    Ok(())
}

/// End the session locally and on the backend.
pub async fn sign_out(mut auth: Signal<AuthState>, backend: &Backend) {
    auth.write().signing_out = true;
    if let Err(e) = backend.sign_out().await {
        tracing::warn!("backend sign-out failed: {e}");
    }
    if let Err(e) = session_slot().clear().await {
        tracing::warn!("could not clear stored session: {e}");
    }
    if let Err(e) = clear_drafts().await {
        tracing::warn!("could not clear checkout drafts: {e}");
    }
    tracing::info!("signed out");
    auth.set(AuthState::signed_out());
}

/// Button that signs the user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sair".to_string())] label: String,
    #[props(default)] class: String,
) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut loading = use_signal(|| false);

    let onclick = move |_: MouseEvent| {
        let backend = backend.clone();
        spawn(async move {
            loading.set(true);
            sign_out(auth, &backend).await;
            loading.set(false);
            toast.info("Você saiu da sua conta".to_string(), ToastOptions::new());
        });
    };

    rsx! {
        Button {
            variant: ButtonVariant::Outline,
            class: "{class}",
            disabled: loading(),
            onclick,
            if loading() { "Saindo..." } else { "{label}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::AuthUser;
    use serde_json::json;

    fn session() -> Session {
        Session {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 3600,
            expires_at: None,
            token_type: "bearer".to_string(),
            user: AuthUser {
                id: Uuid::from_u128(5),
                email: Some("ana@example.com".to_string()),
                user_metadata: json!({ "name": "Ana" }),
                created_at: None,
            },
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(AuthState::default().status(), AuthStatus::Loading);
        assert_eq!(AuthState::signed_out().status(), AuthStatus::SignedOut);
        let state = AuthState {
            session: Some(session()),
            profile: None,
            loading: false,
            signing_out: false,
        };
        assert_eq!(state.status(), AuthStatus::SignedIn);
        assert_eq!(state.user_id(), Some(Uuid::from_u128(5)));
        assert_eq!(state.email(), Some("ana@example.com"));
    }

    #[test]
    fn test_display_name_falls_back_to_metadata() {
        let state = AuthState {
            session: Some(session()),
            profile: None,
            loading: false,
            signing_out: false,
        };
        assert_eq!(state.display_name(), "Ana");
        assert_eq!(AuthState::signed_out().display_name(), "Usuário");
    }

    #[test]
    fn test_refresh_is_discarded_after_sign_out() {
        let refreshed = session();
        let signed_in = AuthState {
            session: Some(session()),
            profile: None,
            loading: false,
            signing_out: false,
        };
        assert!(still_signed_in_as(&signed_in, &refreshed));
        assert!(!still_signed_in_as(&AuthState::signed_out(), &refreshed));

        let mut other = session();
        other.user.id = Uuid::from_u128(6);
        let someone_else = AuthState {
            session: Some(other),
            profile: None,
            loading: false,
            signing_out: false,
        };
        assert!(!still_signed_in_as(&someone_else, &refreshed));

        let leaving = AuthState {
            signing_out: true,
            ..signed_in
        };
        assert_eq!(leaving.status(), AuthStatus::SignedIn);
        assert!(!still_signed_in_as(&leaving, &refreshed));
    }
}
