//! Account settings.

use api::models::{Profile, ProfileUpdate};
use api::services::profiles;
use api::{Backend, BackendError};
use dioxus::prelude::*;
use ui::icons::{FaBell, FaChevronRight, FaKey, FaLock, FaUser};
use ui::{use_auth, AuthState, Icon, SignOutButton};

use crate::Route;

mod account;
mod preferences;
mod profile;

pub use account::SettingsAccount;
pub use preferences::{SettingsNotifications, SettingsPrivacy};
pub use profile::SettingsProfile;

/// Patch the signed-in user's profile and publish the result to the auth state.
pub(crate) async fn save_profile(
    mut auth: Signal<AuthState>,
    backend: &Backend,
    patch: &ProfileUpdate,
) -> Result<Profile, BackendError> {
    let me = auth.peek().user_id().ok_or_else(|| BackendError::Unauthorized("not signed in".to_string()))?;
    let profile = profiles::update(backend, me, patch).await?;
    auth.write().profile = Some(profile.clone());
    tracing::info!(user = %me, "profile updated");
    Ok(profile)
}

#[component]
pub(crate) fn SettingsHeader(title: String) -> Element {
    rsx! {
        div { class: "page-header",
            h1 { "{title}" }
            Link { to: Route::SettingsIndex {}, class: "btn btn-ghost", "Configurações" }
        }
    }
}

#[component]
pub fn SettingsIndex() -> Element {
    let auth = use_auth();
    let email = auth.read().email().unwrap_or_default().to_string();

    rsx! {
        h1 { "Configurações" }
        p { class: "muted", "Conectado como {email}" }
        ul { class: "settings-menu",
            li {
                Link { to: Route::SettingsProfile {},
                    Icon { icon: FaUser, width: 16, height: 16 }
                    span { "Perfil" }
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
            }
            li {
                Link { to: Route::SettingsAccount {},
                    Icon { icon: FaKey, width: 16, height: 16 }
                    span { "Conta e senha" }
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
            }
            li {
                Link { to: Route::SettingsNotifications {},
                    Icon { icon: FaBell, width: 16, height: 16 }
                    span { "Notificações" }
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
            }
            li {
                Link { to: Route::SettingsPrivacy {},
                    Icon { icon: FaLock, width: 16, height: 16 }
                    span { "Privacidade" }
                    Icon { icon: FaChevronRight, width: 12, height: 12 }
                }
            }
        }
        SignOutButton { label: "Sair da conta" }
    }
}
