use api::models::LikeState;
use api::services::posts;
use dioxus::prelude::*;
use uuid::Uuid;

use crate::components::{use_toast, ToastOptions};
use crate::icons::FaHeart;
use crate::{use_auth, use_backend, Icon};

#[component]
pub fn LikeButton(post_id: Uuid, state: Signal<LikeState>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut busy = use_signal(|| false);

    let onclick = move |_: MouseEvent| {
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        if busy() {
            return;
        }
        let backend = backend.clone();
        let previous = state.write().toggle();
        let liked = !previous.liked;
        busy.set(true);
        spawn(async move {
            let result = if liked {
                posts::like(&backend, me, post_id).await
            } else {
                posts::unlike(&backend, me, post_id).await
            };
            if let Err(e) = result {
                tracing::error!(post = %post_id, "like toggle failed: {e}");
                state.write().revert(previous);
                toast.error("Não foi possível curtir a publicação".to_string(), ToastOptions::new());
            }
            busy.set(false);
        });
    };

    let LikeState { liked, count } = state();
    rsx! {
        button {
            r#type: "button",
            class: if liked { "like-button liked" } else { "like-button" },
            aria_pressed: "{liked}",
            disabled: busy(),
            onclick,
            Icon { icon: FaHeart, width: 16, height: 16 }
            span { "{count}" }
        }
    }
}
