//! The feed of posts and publishing a new one.

use std::collections::HashSet;

use api::models::{LikeState, Post};
use api::services::posts;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Label, Spinner, Textarea, ToastOptions};
use ui::icons::FaPlus;
use ui::images::{object_url, revoke_object_url, PickedImage};
use ui::{format, use_auth, use_backend, Avatar, Icon, ImagePicker, LikeButton};

use crate::Route;

const CAPTION_MAX: u32 = 2200;

#[component]
pub fn Feed() -> Element {
    let auth = use_auth();
    let backend = use_backend();

    let feed = use_resource(move || {
        let backend = backend.clone();
        async move {
            let me = auth().user_id()?;
            Some(posts::feed(&backend, me).await)
        }
    });

    rsx! {
        div { class: "page-header",
            h1 { "Feed" }
            Link { to: Route::PostCreate {}, class: "btn btn-primary",
                Icon { icon: FaPlus, width: 14, height: 14 }
                "Publicar"
            }
        }
        match &*feed.read() {
            None | Some(None) => rsx! { Spinner {} },
            Some(Some(Err(e))) => {
                tracing::error!("failed to load feed: {e}");
                rsx! { ErrorBanner { message: Some(format::backend_error(e)) } }
            }
            Some(Some(Ok(list))) if list.is_empty() => rsx! {
                p { class: "empty",
                    "Nada por aqui ainda. "
                    Link { to: Route::UserSearch {}, "Encontre pessoas para seguir" }
                }
            },
            Some(Some(Ok(list))) => rsx! {
                PostList { posts: list.clone() }
            },
        }
    }
}

/// Posts with like buttons; fetches which ones the viewer has liked.
#[component]
pub(crate) fn PostList(posts: Vec<Post>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let liked = use_resource(use_reactive!(|ids| {
        let backend = backend.clone();
        async move {
            let Some(me) = auth.peek().user_id() else {
                return HashSet::new();
            };
            posts::liked_by(&backend, me, &ids).await.unwrap_or_else(|e| {
                tracing::warn!("could not load likes: {e}");
                HashSet::new()
            })
        }
    }));

    let Some(liked) = liked() else {
        return rsx! { Spinner {} };
    };

    rsx! {
        div { class: "post-list",
            for post in posts {
                PostCard { key: "{post.id}", liked: liked.contains(&post.id), post }
            }
        }
    }
}

#[component]
fn PostCard(post: Post, liked: bool) -> Element {
    let like = use_signal(|| LikeState::new(liked, post.likes_count));
    let author = post.author.clone();
    let name = author
        .as_ref()
        .map(|a| a.display_name().to_string())
        .unwrap_or_else(|| "Usuário".to_string());

    rsx! {
        article { class: "post",
            header { class: "post-header",
                Link { to: Route::ProfileView { id: post.user_id }, class: "post-author",
                    Avatar { url: author.and_then(|a| a.avatar_url), name: name.clone(), size: 36 }
                    strong { "{name}" }
                }
                span { class: "muted", "{format::relative_time(post.created_at, chrono::Utc::now())}" }
            }
            if let Some(url) = &post.image_url {
                img { class: "post-image", src: "{url}", alt: "" }
            }
            div { class: "post-footer",
                LikeButton { post_id: post.id, state: like }
                if post.comments_count > 0 {
                    span { class: "muted", {format::plural(post.comments_count, "comentário", "comentários")} }
                }
            }
            if let Some(caption) = &post.caption {
                p { class: "post-caption", "{caption}" }
            }
        }
    }
}

#[component]
pub fn PostCreate() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let nav = use_navigator();
    let mut caption = use_signal(String::new);
    let mut image = use_signal(|| Option::<PickedImage>::None);
    let mut preview = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let on_image = move |picked: PickedImage| {
        if let Some(old) = preview.take() {
            revoke_object_url(&old);
        }
        preview.set(object_url(&picked.bytes, &picked.content_type));
        image.set(Some(picked));
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        let picked = image.peek().clone();
        let text = caption.peek().clone();
        if picked.is_none() && text.trim().is_empty() {
            error.set(Some("Adicione uma imagem ou uma legenda".to_string()));
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let upload = picked.map(|p| (p.bytes, p.content_type));
            match posts::create(&backend, me, upload, &text).await {
                Ok(_) => {
                    if let Some(old) = preview.take() {
                        revoke_object_url(&old);
                    }
                    toast.success("Publicado!".to_string(), ToastOptions::new());
                    nav.replace(Route::Feed {});
                }
                Err(e) => {
                    tracing::error!("failed to publish post: {e}");
                    error.set(Some(format::backend_error(&e)));
                    loading.set(false);
                }
            }
        });
    };

    rsx! {
        h1 { "Nova publicação" }
        form { class: "form-card", onsubmit: handle_submit,
            ErrorBanner { message: error() }
            div { class: "field",
                if let Some(src) = preview() {
                    img { class: "post-image", src: "{src}", alt: "Pré-visualização" }
                }
                ImagePicker { id: "post-image", label: "Escolher foto", disabled: loading(), onpick: on_image }
            }
            div { class: "field",
                Label { html_for: "caption", "Legenda" }
                Textarea {
                    id: "caption",
                    rows: 4,
                    maxlength: CAPTION_MAX,
                    value: caption(),
                    oninput: move |evt: FormEvent| caption.set(evt.value()),
                }
                p { class: "muted counter", "{caption.read().chars().count()}/{CAPTION_MAX}" }
            }
            div { class: "form-actions",
                Link { to: Route::Feed {}, class: "btn btn-ghost", "Cancelar" }
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Publicando..." } else { "Publicar" }
                }
            }
        }
    }
}
