//! Toggles that save as soon as they change.

use api::models::{NotificationPreferences, ProfileUpdate};
use dioxus::prelude::*;
use ui::components::{use_toast, Spinner, ToastOptions};
use ui::{format, use_auth, use_backend};

use super::{save_profile, SettingsHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preference {
    Follows,
    Likes,
    Tickets,
    Events,
    Email,
}

impl Preference {
    const ALL: [Preference; 5] = [
        Preference::Follows,
        Preference::Likes,
        Preference::Tickets,
        Preference::Events,
        Preference::Email,
    ];

    fn label(self) -> &'static str {
        match self {
            Preference::Follows => "Novos seguidores",
            Preference::Likes => "Curtidas nas suas publicações",
            Preference::Tickets => "Compras de ingressos",
            Preference::Events => "Novidades dos eventos que você segue",
            Preference::Email => "Receber também por e-mail",
        }
    }

    fn flag(self, prefs: &mut NotificationPreferences) -> &mut bool {
        match self {
            Preference::Follows => &mut prefs.follows,
            Preference::Likes => &mut prefs.likes,
            Preference::Tickets => &mut prefs.tickets,
            Preference::Events => &mut prefs.events,
            Preference::Email => &mut prefs.email,
        }
    }

    fn get(self, mut prefs: NotificationPreferences) -> bool {
        *self.flag(&mut prefs)
    }
}

#[component]
fn Toggle(id: String, label: String, checked: bool, disabled: bool, onchange: EventHandler<bool>) -> Element {
    rsx! {
        label { class: "toggle", r#for: "{id}",
            span { "{label}" }
            input {
                id: "{id}",
                r#type: "checkbox",
                role: "switch",
                checked,
                disabled,
                onchange: move |evt: FormEvent| onchange.call(evt.checked()),
            }
        }
    }
}

#[component]
pub fn SettingsNotifications() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut saving = use_signal(|| false);

    let Some(prefs) = auth.read().profile.as_ref().map(|p| p.notification_preferences) else {
        return rsx! { Spinner {} };
    };

    let set = use_callback(move |(preference, value): (Preference, bool)| {
        let before = match auth.peek().profile.as_ref() {
            Some(profile) => profile.notification_preferences,
            None => return,
        };
        let mut after = before;
        *preference.flag(&mut after) = value;
        let backend = backend.clone();
        spawn(async move {
            saving.set(true);
            let patch = ProfileUpdate {
                notification_preferences: Some(after),
                ..Default::default()
            };
            let result = save_profile(auth, &backend, &patch).await;
            saving.set(false);
            if let Err(e) = result {
                tracing::error!("failed to save notification preferences: {e}");
                toast.error(format::backend_error(&e), ToastOptions::new());
            }
        });
    });

    rsx! {
        SettingsHeader { title: "Notificações" }
        section { class: "form-card",
            p { class: "muted", "Escolha o que aparece no seu sino de notificações." }
            for preference in Preference::ALL {
                Toggle {
                    key: "{preference:?}",
                    id: format!("pref-{preference:?}").to_lowercase(),
                    label: preference.label().to_string(),
                    checked: preference.get(prefs),
                    disabled: saving(),
                    onchange: move |value| set.call((preference, value)),
                }
            }
        }
    }
}

#[component]
pub fn SettingsPrivacy() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut saving = use_signal(|| false);
    let is_private = auth.read().profile.as_ref().map(|p| p.is_private).unwrap_or(false);

    let onchange = move |value: bool| {
        let backend = backend.clone();
        spawn(async move {
            saving.set(true);
            let patch = ProfileUpdate {
                is_private: Some(value),
                ..Default::default()
            };
            let result = save_profile(auth, &backend, &patch).await;
            saving.set(false);
            match result {
                Ok(_) if value => toast.info("Sua conta agora é privada".to_string(), ToastOptions::new()),
                Ok(_) => toast.info("Sua conta agora é pública".to_string(), ToastOptions::new()),
                Err(e) => {
                    tracing::error!("failed to save privacy setting: {e}");
                    toast.error(format::backend_error(&e), ToastOptions::new());
                }
            }
        });
    };

    rsx! {
        SettingsHeader { title: "Privacidade" }
        section { class: "form-card",
            Toggle {
                id: "private-account",
                label: "Conta privada",
                checked: is_private,
                disabled: saving(),
                onchange,
            }
            p { class: "hint",
                "Com a conta privada, só seus seguidores veem suas publicações e os eventos que você organiza."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_flags() {
        let mut prefs = NotificationPreferences::default();
        assert!(Preference::Likes.get(prefs));
        assert!(!Preference::Email.get(prefs));
        *Preference::Likes.flag(&mut prefs) = false;
        assert!(!prefs.likes);
        assert!(prefs.follows);
    }
}
