use api::models::FollowState;
use api::services::follows;
use dioxus::prelude::*;
use uuid::Uuid;

use crate::components::{use_toast, Button, ButtonVariant, ToastOptions};
use crate::{use_auth, use_backend};

/// Follow/unfollow toggle. Updates `state` right away and rolls it back if the
/// backend call fails.
#[component]
pub fn FollowButton(profile_id: Uuid, state: Signal<FollowState>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut busy = use_signal(|| false);

    let Some(me) = auth.read().user_id() else {
        return rsx! {};
    };
    if me == profile_id {
        return rsx! {};
    }

    let onclick = move |_: MouseEvent| {
        if busy() {
            return;
        }
        let backend = backend.clone();
        let my_name = auth.peek().display_name();
        let previous = state.write().toggle();
        let following = !previous.following;
        busy.set(true);
        spawn(async move {
            let result = if following {
                follows::follow(&backend, me, profile_id, &my_name).await
            } else {
                follows::unfollow(&backend, me, profile_id).await
            };
            if let Err(e) = result {
                tracing::error!(profile = %profile_id, "follow toggle failed: {e}");
                state.write().revert(previous);
                toast.error("Não foi possível atualizar. Tente novamente.".to_string(), ToastOptions::new());
            }
            busy.set(false);
        });
    };

    let following = state.read().following;
    rsx! {
        Button {
            variant: if following { ButtonVariant::Outline } else { ButtonVariant::Primary },
            disabled: busy(),
            onclick,
            if following { "Seguindo" } else { "Seguir" }
        }
    }
}
