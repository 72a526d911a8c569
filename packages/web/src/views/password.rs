//! Password recovery: asking for the e-mail, then choosing a new password.

use api::backend::auth::LinkTokens;
use api::{validate, UserAttributes};
use dioxus::prelude::*;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Input, Label, Spinner, ToastOptions};
use ui::{format, sign_out, use_auth, use_backend};

use super::message_for;
use crate::Route;

#[component]
pub fn ForgotPassword() -> Element {
    let backend = use_backend();
    let mut email = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut sent = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            let e = email().trim().to_string();
            if let Err(v) = validate::email(&e) {
                invalid.set(Some(v));
                return;
            }
            invalid.set(None);

            loading.set(true);
            let redirect_to = format!("{}/redefinir-senha", backend.config().site_url);
            match backend.reset_password_for_email(&e, &redirect_to).await {
                Ok(()) => sent.set(true),
                Err(err) => {
                    tracing::warn!("password recovery request failed: {err}");
                    error.set(Some(format::backend_error(&err)));
                }
            }
            loading.set(false);
        });
    };

    if sent() {
        return rsx! {
            div { class: "auth-form",
                h2 { "Verifique seu e-mail" }
                p { "Se existir uma conta para {email}, você receberá um link para criar uma nova senha." }
                Link { to: Route::Login { redirect: String::new() }, "Voltar ao login" }
            }
        };
    }

    rsx! {
        form { class: "auth-form", onsubmit: handle_submit,
            h2 { "Esqueceu a senha?" }
            p { class: "muted", "Informe seu e-mail e enviaremos um link para redefinir a senha." }
            ErrorBanner { message: error() }

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

            Button {
                variant: ButtonVariant::Primary,
                class: "w-full",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Enviando..." } else { "Enviar link" }
            }

            div { class: "auth-links",
                Link { to: Route::Login { redirect: String::new() }, "Voltar ao login" }
            }
        }
    }
}

/// The recovery tokens in the current URL's fragment.
fn recovery_tokens() -> Option<LinkTokens> {
    #[cfg(target_arch = "wasm32")]
    {
        let hash = web_sys::window()?.location().hash().ok()?;
        LinkTokens::from_fragment(&hash).filter(LinkTokens::is_recovery)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[component]
pub fn ResetPassword() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let nav = use_navigator();
    let tokens = use_hook(recovery_tokens);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let Some(tokens) = tokens else {
        return rsx! {
            div { class: "auth-page",
                div { class: "auth-card",
                    h2 { "Link inválido ou expirado" }
                    p { "Peça um novo link de recuperação de senha." }
                    Link { to: Route::ForgotPassword {}, class: "btn btn-primary", "Recuperar senha" }
                }
            }
        };
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let backend = backend.clone();
        let access_token = tokens.access_token.clone();
        spawn(async move {
            error.set(None);
            let p = password();
            let check = validate::password(&p).and_then(|()| validate::password_confirmation(&p, &confirm_password()));
            if let Err(v) = check {
                invalid.set(Some(v));
                return;
            }
            invalid.set(None);

            loading.set(true);
            // The link's one-off session authorizes the change
            backend.set_access_token(Some(access_token));
            let attributes = UserAttributes {
                password: Some(p),
                ..Default::default()
            };
            match backend.update_user(&attributes).await {
                Ok(_) => {
                    tracing::info!("password reset");
                    sign_out(auth, &backend).await;
                    toast.success("Senha alterada. Entre com a nova senha.".to_string(), ToastOptions::new());
                    nav.replace(Route::Login { redirect: String::new() });
                }
                Err(err) => {
                    tracing::warn!("password reset failed: {err}");
                    backend.set_access_token(auth.peek().session.as_ref().map(|s| s.access_token.clone()));
                    error.set(Some(format::backend_error(&err)));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { class: "auth-brand", "Agito" }
                form { class: "auth-form", onsubmit: handle_submit,
                    h2 { "Nova senha" }
                    ErrorBanner { message: error() }

                    div { class: "field",
                        Label { html_for: "password", "Nova senha" }
                        Input {
                            id: "password",
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

                    if loading() {
                        Spinner { label: "Salvando..." }
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        class: "w-full",
                        r#type: "submit",
                        disabled: loading(),
                        "Salvar nova senha"
                    }
                }
            }
        }
    }
}
