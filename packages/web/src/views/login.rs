//! Login page with email/password form.

use api::validate;
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, ErrorBanner, Input, Label};
use ui::{establish_session, format, use_auth, use_backend};

use super::message_for;
use crate::guard::after_login;
use crate::Route;

#[component]
pub fn Login(redirect: String) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let backend = backend.clone();
        let redirect = redirect.clone();
        spawn(async move {
            error.set(None);
            let e = email().trim().to_string();
            let p = password();
            if let Err(v) = validate::sign_in(&e, &p) {
                invalid.set(Some(v));
                return;
            }
            invalid.set(None);

            loading.set(true);
            let result = match backend.sign_in_with_password(&e, &p).await {
                Ok(session) => establish_session(auth, &backend, session, "").await,
                Err(err) => Err(err),
            };
            loading.set(false);
            match result {
                Ok(()) => {
                    nav.replace(after_login(&redirect));
                }
                Err(err) => {
                    tracing::warn!("sign-in failed: {err}");
                    error.set(Some(format::backend_error(&err)));
                }
            }
        });
    };

    rsx! {
        form { class: "auth-form", onsubmit: handle_login,
            ErrorBanner { message: error() }

            div { class: "field",
                Label { html_for: "email", "E-mail" }
                Input {
                    id: "email",
                    r#type: "email",
                    autocomplete: "email",
                    placeholder: "voce@exemplo.com",
                    value: email(),
                    invalid: message_for(&invalid(), "email").is_some(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "email") {
                    p { class: "field-error", "{msg}" }
                }
            }

            div { class: "field",
                Label { html_for: "password", "Senha" }
                Input {
                    id: "password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: password(),
                    invalid: message_for(&invalid(), "password").is_some(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "password") {
                    p { class: "field-error", "{msg}" }
                }
            }

            Button {
                variant: ButtonVariant::Primary,
                class: "w-full",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Entrando..." } else { "Entrar" }
            }

            div { class: "auth-links",
                Link { to: Route::ForgotPassword {}, "Esqueceu a senha?" }
                span {
                    "Não tem conta? "
                    Link { to: Route::Register {}, "Cadastre-se" }
                }
            }
        }
    }
}
