use api::{validate, UserAttributes};
use dioxus::prelude::*;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Input, Label, ToastOptions};
use ui::{format, use_auth, use_backend, SignOutButton};

use super::SettingsHeader;
use crate::views::message_for;

#[component]
pub fn SettingsAccount() -> Element {
    rsx! {
        SettingsHeader { title: "Conta e senha" }
        EmailForm {}
        PasswordForm {}
        section { class: "form-card",
            h2 { "Sessão" }
            p { class: "muted", "Sair remove a sessão e as compras em andamento deste dispositivo." }
            SignOutButton {}
        }
    }
}

#[component]
fn EmailForm() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let current = auth.read().email().unwrap_or_default().to_string();
    let mut email = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let new_email = email().trim().to_string();
        if let Err(v) = validate::email(&new_email) {
            invalid.set(Some(v));
            return;
        }
        if auth.peek().email() == Some(new_email.as_str()) {
            invalid.set(Some(api::ValidationError::new("email", "Este já é o seu e-mail")));
            return;
        }
        invalid.set(None);
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let attributes = UserAttributes {
                email: Some(new_email),
                ..Default::default()
            };
            let result = backend.update_user(&attributes).await;
            loading.set(false);
            match result {
                Ok(_) => {
                    email.set(String::new());
                    toast.info(
                        "Enviamos um link de confirmação para o novo e-mail".to_string(),
                        ToastOptions::new(),
                    );
                }
                Err(e) => {
                    tracing::warn!("email change failed: {e}");
                    error.set(Some(format::backend_error(&e)));
                }
            }
        });
    };

    rsx! {
        form { class: "form-card", onsubmit: handle_submit,
            h2 { "E-mail" }
            p { class: "muted", "Atual: {current}" }
            ErrorBanner { message: error() }
            div { class: "field",
                Label { html_for: "new-email", "Novo e-mail" }
                Input {
                    id: "new-email",
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
            Button {
                variant: ButtonVariant::Primary,
                r#type: "submit",
                disabled: loading(),
                if loading() { "Enviando..." } else { "Alterar e-mail" }
            }
        }
    }
}

#[component]
fn PasswordForm() -> Element {
    let backend = use_backend();
    let toast = use_toast();
    let mut password = use_signal(String::new);
    let mut confirmation = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let p = password();
        let check = validate::password(&p).and_then(|_| validate::password_confirmation(&p, &confirmation()));
        if let Err(v) = check {
            invalid.set(Some(v));
            return;
        }
        invalid.set(None);
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let attributes = UserAttributes {
                password: Some(p),
                ..Default::default()
            };
            let result = backend.update_user(&attributes).await;
            loading.set(false);
            match result {
                Ok(_) => {
                    password.set(String::new());
                    confirmation.set(String::new());
                    tracing::info!("password changed");
                    toast.success("Senha alterada".to_string(), ToastOptions::new());
                }
                Err(e) => {
                    tracing::warn!("password change failed: {e}");
                    error.set(Some(format::backend_error(&e)));
                }
            }
        });
    };

    rsx! {
        form { class: "form-card", onsubmit: handle_submit,
            h2 { "Senha" }
            ErrorBanner { message: error() }
            div { class: "field",
                Label { html_for: "new-password", "Nova senha" }
                Input {
                    id: "new-password",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: password(),
                    invalid: message_for(&invalid(), "password").is_some(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "password") {
                    p { class: "field-error", "{msg}" }
                }
            }
            div { class: "field",
                Label { html_for: "confirm-password", "Confirme a nova senha" }
                Input {
                    id: "confirm-password",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: confirmation(),
                    invalid: message_for(&invalid(), "password_confirmation").is_some(),
                    oninput: move |evt: FormEvent| confirmation.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "password_confirmation") {
                    p { class: "field-error", "{msg}" }
                }
            }
            Button {
                variant: ButtonVariant::Primary,
                r#type: "submit",
                disabled: loading(),
                if loading() { "Salvando..." } else { "Alterar senha" }
            }
        }
    }
}
