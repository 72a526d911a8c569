use api::models::ProfileUpdate;
use api::services::profiles;
use api::validate;
use dioxus::prelude::*;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Input, Label, Textarea, ToastOptions};
use ui::images::{object_url, revoke_object_url, PickedImage};
use ui::{format, use_auth, use_backend, Avatar, ImageCropper, ImagePicker};

use super::{save_profile, SettingsHeader};
use crate::views::message_for;

const BIO_MAX: u32 = 160;

/// Empty fields clear the column.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Username as stored: no leading `@`, lowercase.
fn normalize_username(value: &str) -> String {
    value.trim().trim_start_matches('@').to_lowercase()
}

fn profile_patch(name: &str, username: &str, bio: &str) -> Result<ProfileUpdate, api::ValidationError> {
    validate::required("name", "Nome", name)?;
    let username = optional(&normalize_username(username));
    if let Some(username) = &username {
        validate::username(username)?;
    }
    Ok(ProfileUpdate {
        name: Some(name.trim().to_string()),
        username,
        bio: Some(bio.trim().to_string()),
        ..Default::default()
    })
}

#[component]
pub fn SettingsProfile() -> Element {
    let mut auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    let initial = auth.peek().profile.clone();
    let mut name = use_signal(|| initial.as_ref().and_then(|p| p.name.clone()).unwrap_or_default());
    let mut username = use_signal(|| initial.as_ref().and_then(|p| p.username.clone()).unwrap_or_default());
    let mut bio = use_signal(|| initial.as_ref().and_then(|p| p.bio.clone()).unwrap_or_default());
    let mut invalid = use_signal(|| None::<api::ValidationError>);
    let mut error = use_signal(|| Option::<String>::None);
    let mut saving = use_signal(|| false);

    // Object URL of the picked image while it is being cropped
    let mut cropping = use_signal(|| Option::<String>::None);
    let mut uploading = use_signal(|| false);

    use_drop(move || {
        if let Ok(current) = cropping.try_peek() {
            if let Some(url) = current.as_deref() {
                revoke_object_url(url);
            }
        }
    });

    let upload_backend = backend.clone();
    let upload = move |bytes: Vec<u8>, content_type: String| {
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        let backend = upload_backend.clone();
        spawn(async move {
            uploading.set(true);
            let result = profiles::upload_avatar(&backend, me, bytes, &content_type).await;
            uploading.set(false);
            match result {
                Ok(profile) => {
                    auth.write().profile = Some(profile);
                    toast.success("Foto atualizada".to_string(), ToastOptions::new());
                }
                Err(e) => {
                    tracing::error!("avatar upload failed: {e}");
                    toast.error(format::backend_error(&e), ToastOptions::new());
                }
            }
        });
    };

    let on_pick = {
        let upload = upload.clone();
        move |picked: PickedImage| {
            if let Some(old) = cropping.take() {
                revoke_object_url(&old);
            }
            match object_url(&picked.bytes, &picked.content_type) {
                Some(url) => cropping.set(Some(url)),
                // No blob URLs off the browser; upload the image as picked
                None => upload(picked.bytes, picked.content_type),
            }
        }
    };

    let mut close_cropper = move || {
        if let Some(url) = cropping.take() {
            revoke_object_url(&url);
        }
    };

    let on_crop = {
        let upload = upload.clone();
        move |png: Vec<u8>| {
            close_cropper();
            upload(png, "image/png".to_string());
        }
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if saving() {
            return;
        }
        let patch = match profile_patch(&name(), &username(), &bio()) {
            Ok(patch) => patch,
            Err(v) => {
                invalid.set(Some(v));
                return;
            }
        };
        invalid.set(None);
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            saving.set(true);
            let result = save_profile(auth, &backend, &patch).await;
            saving.set(false);
            match result {
                Ok(profile) => {
                    username.set(profile.username.unwrap_or_default());
                    toast.success("Perfil atualizado".to_string(), ToastOptions::new());
                }
                Err(e) => {
                    tracing::error!("profile update failed: {e}");
                    error.set(Some(format::backend_error(&e)));
                }
            }
        });
    };

    let (avatar_url, display_name) = {
        let auth = auth.read();
        (
            auth.profile.as_ref().and_then(|p| p.avatar_url.clone()),
            auth.display_name(),
        )
    };

    let picker_label = if uploading() { "Enviando..." } else { "Trocar foto" };

    rsx! {
        SettingsHeader { title: "Perfil" }

        section { class: "form-card avatar-settings",
            if let Some(src) = cropping() {
                ImageCropper {
                    src,
                    on_confirm: on_crop,
                    on_cancel: move |_| close_cropper(),
                }
            } else {
                Avatar { url: avatar_url, name: display_name, size: 96 }
                ImagePicker {
                    id: "avatar",
                    label: picker_label.to_string(),
                    disabled: uploading(),
                    onpick: on_pick,
                }
            }
        }

        form { class: "form-card", onsubmit: handle_submit,
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
                Label { html_for: "username", "Nome de usuário" }
                Input {
                    id: "username",
                    autocomplete: "username",
                    placeholder: "@seu.nome",
                    value: username(),
                    invalid: message_for(&invalid(), "username").is_some(),
                    oninput: move |evt: FormEvent| username.set(evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "username") {
                    p { class: "field-error", "{msg}" }
                }
            }
            div { class: "field",
                Label { html_for: "bio", "Bio" }
                Textarea {
                    id: "bio",
                    rows: 3,
                    maxlength: BIO_MAX,
                    value: bio(),
                    oninput: move |evt: FormEvent| bio.set(evt.value()),
                }
                p { class: "hint", "{bio().chars().count()}/{BIO_MAX}" }
            }
            Button {
                variant: ButtonVariant::Primary,
                r#type: "submit",
                disabled: saving(),
                if saving() { "Salvando..." } else { "Salvar" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" oi "), Some("oi".to_string()));
    }

    #[test]
    fn test_profile_patch() {
        let patch = profile_patch(" Ana ", "@Ana.Souza", " oi ").unwrap();
        assert_eq!(patch.name.as_deref(), Some("Ana"));
        assert_eq!(patch.username.as_deref(), Some("ana.souza"));
        assert_eq!(patch.bio.as_deref(), Some("oi"));
        assert_eq!(profile_patch("Ana", " ", "").unwrap().username, None);
        assert_eq!(profile_patch("", "", "").unwrap_err().field, "name");
        assert_eq!(profile_patch("Ana", "a b", "").unwrap_err().field, "username");
    }
}
