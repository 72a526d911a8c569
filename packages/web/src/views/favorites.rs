use api::models::Favorite;
use api::services::favorites;
use dioxus::prelude::*;
use ui::components::{use_toast, ErrorBanner, Spinner, ToastOptions};
use ui::icons::FaTrash;
use ui::{format, use_auth, use_backend, Icon};

use crate::Route;

#[component]
pub fn Favorites() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut items = use_signal(|| Option::<Vec<Favorite>>::None);
    let mut error = use_signal(|| Option::<String>::None);

    let load_backend = backend.clone();
    let _ = use_resource(move || {
        let backend = load_backend.clone();
        async move {
            let Some(me) = auth().user_id() else {
                return;
            };
            match favorites::list(&backend, me).await {
                Ok(list) => items.set(Some(list)),
                Err(e) => {
                    tracing::error!("failed to load favorites: {e}");
                    error.set(Some(format::backend_error(&e)));
                }
            }
        }
    });

    let remove = use_callback(move |event_id: uuid::Uuid| {
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        let backend = backend.clone();
        let snapshot = items.peek().clone();
        if let Some(list) = items.write().as_mut() {
            list.retain(|f| f.event_id != event_id);
        }
        spawn(async move {
            if let Err(e) = favorites::remove(&backend, me, event_id).await {
                tracing::error!(event = %event_id, "failed to remove favorite: {e}");
                items.set(snapshot);
                toast.error(format::backend_error(&e), ToastOptions::new());
            }
        });
    });

    rsx! {
        h1 { "Favoritos" }
        ErrorBanner { message: error() }
        match items() {
            None if error().is_none() => rsx! { Spinner {} },
            None => rsx! {},
            Some(list) if list.is_empty() => rsx! {
                p { class: "empty",
                    "Você ainda não favoritou nenhum evento. "
                    Link { to: Route::EventList {}, "Explorar eventos" }
                }
            },
            Some(list) => rsx! {
                ul { class: "list",
                    for favorite in list {
                        if let Some(event) = favorite.event {
                            li { key: "{favorite.event_id}", class: "list-item",
                                Link { to: Route::EventDetail { id: event.id }, class: "list-item-main",
                                    if let Some(url) = &event.image_url {
                                        img { class: "thumb", src: "{url}", alt: "" }
                                    }
                                    div {
                                        strong { "{event.title}" }
                                        p { class: "muted", "{format::event_date(event.date)} · {event.location}" }
                                    }
                                }
                                button {
                                    class: "icon-button",
                                    title: "Remover dos favoritos",
                                    onclick: move |_| remove.call(favorite.event_id),
                                    Icon { icon: FaTrash, width: 14, height: 14 }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}
