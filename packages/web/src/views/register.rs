//! Sign-up page.

use api::{validate, SignUp};
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, ErrorBanner, Input, Label};
use ui::{establish_session, format, use_auth, use_backend};

use super::message_for;
use crate::Route;

#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut pending_confirmation = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();
            if let Err(v) = validate::sign_up(&n, &e, &p, &confirm_password()) {
                invalid.set(Some(v));
                return;
            }
            invalid.set(None);

            loading.set(true);
            let outcome = backend.sign_up(&e, &p, &n).await;
            let result = match outcome {
                Ok(SignUp::Session(session)) => establish_session(auth, &backend, session, &n)
                    .await
                    .map(|()| true),
                Ok(SignUp::ConfirmationPending(_)) => Ok(false),
                Err(err) => Err(err),
            };
            loading.set(false);
            match result {
                Ok(true) => {
                    nav.replace(Route::EventList {});
                }
                Ok(false) => pending_confirmation.set(Some(e)),
                Err(err) => {
                    tracing::warn!("sign-up failed: {err}");
                    error.set(Some(format::backend_error(&err)));
                }
            }
        });
    };

    if let Some(address) = pending_confirmation() {
        return rsx! {
            div { class: "auth-form",
                h2 { "Confirme seu e-mail" }
                p { "Enviamos um link de confirmação para {address}. Depois de confirmar, é só entrar." }
                Link { to: Route::Login { redirect: String::new() }, class: "btn btn-primary", "Ir para o login" }
            }
        };
    }

    rsx! {
        form { class: "auth-form", onsubmit: handle_register,
            h2 { "Criar conta" }
            ErrorBanner { message: error() }

            div { class: "field",
                Label { html_for: "name", "Nome" }
                Input {
                    id: "name",
                    autocomplete: "name",
                    value: name(),
                    invalid: message_for(&invalid(), "name").is_some(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "name") {
                    p { class: "field-error", "{msg}" }
                }
            }

            div { class: "field",
                Label { html_for: "email", "E-mail" }
                Input {
                    id: "email",
                    r#type: "email",
                    autocomplete: "email",
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
                    autocomplete: "new-password",
                    placeholder: "Mínimo de {validate::MIN_PASSWORD_LEN} caracteres",
                    value: password(),
                    invalid: message_for(&invalid(), "password").is_some(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "password") {
                    p { class: "field-error", "{msg}" }
                }
            }

            div { class: "field",
                Label { html_for: "password_confirmation", "Confirmar senha" }
                Input {
                    id: "password_confirmation",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: confirm_password(),
                    invalid: message_for(&invalid(), "password_confirmation").is_some(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "password_confirmation") {
                    p { class: "field-error", "{msg}" }
                }
            }

            Button {
                variant: ButtonVariant::Primary,
                class: "w-full",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Criando conta..." } else { "Cadastrar" }
            }

            div { class: "auth-links",
                span {
                    "Já tem conta? "
                    Link { to: Route::Login { redirect: String::new() }, "Entrar" }
                }
            }
        }
    }
}
