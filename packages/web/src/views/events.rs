//! Event list and event detail.

use std::time::Duration;

use api::geo::{osm_embed_url, osm_link, BoundingBox, Coordinates};
use api::models::{EventFilter, CATEGORIES};
use api::services::{events, favorites};
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{use_toast, Button, ButtonVariant, ErrorBanner, Input, Spinner, ToastOptions};
use ui::icons::{FaCalendarDays, FaHeart, FaLocationDot, FaPlus, FaUsers};
use ui::{format, use_auth, use_backend, Avatar, EventCard, Icon, Markdown};

use crate::Route;

/// Pause before a search is sent, so typing does not fire a request per key.
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[component]
pub fn EventList() -> Element {
    let backend = use_backend();
    let mut search = use_signal(String::new);
    let mut category = use_signal(|| Option::<String>::None);
    let mut upcoming_only = use_signal(|| true);

    let events = use_resource(move || {
        let backend = backend.clone();
        let filter = EventFilter {
            search: Some(search()),
            category: category(),
            upcoming_only: upcoming_only(),
            ..Default::default()
        };
        async move {
            if filter.search_term().is_some() {
                ui::sleep(SEARCH_DEBOUNCE).await;
            }
            events::list(&backend, &filter).await
        }
    });

    let listing = match &*events.read() {
        None => rsx! { Spinner {} },
        Some(Err(e)) => {
            tracing::error!("failed to load events: {e}");
            rsx! { ErrorBanner { message: Some(format::backend_error(e)) } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! {
            p { class: "empty", "Nenhum evento encontrado." }
        },
        Some(Ok(list)) => rsx! {
            div { class: "event-grid",
                for event in list.iter().cloned() {
                    EventCard { key: "{event.id}", event }
                }
            }
        },
    };

    rsx! {
        div { class: "page-header",
            h1 { "Eventos" }
            Link { to: Route::EventCreate {}, class: "btn btn-primary",
                Icon { icon: FaPlus, width: 14, height: 14 }
                "Criar evento"
            }
        }

        div { class: "filters",
            Input {
                r#type: "search",
                placeholder: "Buscar por nome ou local",
                value: search(),
                oninput: move |evt: FormEvent| search.set(evt.value()),
            }
            div { class: "chips",
                button {
                    class: if category().is_none() { "chip active" } else { "chip" },
                    onclick: move |_| category.set(None),
                    "Todos"
                }
                for name in CATEGORIES.iter().copied() {
                    button {
                        key: "{name}",
                        class: if category().as_deref() == Some(name) { "chip active" } else { "chip" },
                        onclick: move |_| category.set(Some(name.to_string())),
                        "{name}"
                    }
                }
            }
            label { class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: upcoming_only(),
                    onchange: move |evt: FormEvent| upcoming_only.set(evt.checked()),
                }
                " Somente próximos"
            }
        }

        {listing}
    }
}

#[component]
pub fn EventDetail(id: Uuid) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let mut favorite = use_signal(|| false);
    let mut favorite_busy = use_signal(|| false);

    let event = use_resource({
        let backend = backend.clone();
        use_reactive!(|id| {
            let backend = backend.clone();
            async move { events::get(&backend, id).await }
        })
    });

    let _ = use_resource({
        let backend = backend.clone();
        use_reactive!(|id| {
            let backend = backend.clone();
            async move {
                let Some(me) = auth.peek().user_id() else {
                    return;
                };
                match favorites::is_favorite(&backend, me, id).await {
                    Ok(value) => favorite.set(value),
                    Err(e) => tracing::warn!("could not check favorite: {e}"),
                }
            }
        })
    });

    let toggle_favorite = move |_: MouseEvent| {
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        if favorite_busy() {
            return;
        }
        let backend = backend.clone();
        let now_favorite = !favorite();
        favorite.set(now_favorite);
        favorite_busy.set(true);
        spawn(async move {
            let result = if now_favorite {
                favorites::add(&backend, me, id).await
            } else {
                favorites::remove(&backend, me, id).await
            };
            match result {
                Ok(()) if now_favorite => toast.success("Adicionado aos favoritos".to_string(), ToastOptions::new()),
                Ok(()) => {}
                Err(e) => {
                    tracing::error!(event = %id, "favorite toggle failed: {e}");
                    favorite.set(!now_favorite);
                    toast.error(format::backend_error(&e), ToastOptions::new());
                }
            }
            favorite_busy.set(false);
        });
    };

    let event = match &*event.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            tracing::error!(event = %id, "failed to load event: {e}");
            return rsx! {
                ErrorBanner { message: Some(format::backend_error(e)) }
                Link { to: Route::EventList {}, "Voltar para eventos" }
            };
        }
        Some(Ok(event)) => event.clone(),
    };

    let is_organizer = auth.read().user_id() == Some(event.organizer_id);
    let is_past = !event.is_upcoming(chrono::Utc::now());
    let point = Coordinates::of(&event);
    let map_url = point
        .and_then(|p| BoundingBox::around([p]))
        .map(|b| osm_embed_url(b.padded(0.0, 0.005), point));
    let organizer = event.organizer.clone();

    rsx! {
        article { class: "event-detail",
            if let Some(url) = &event.image_url {
                img { class: "event-cover", src: "{url}", alt: "{event.title}" }
            }
            div { class: "event-detail-header",
                span { class: "event-card-category", "{event.category}" }
                h1 { "{event.title}" }
                div { class: "event-actions",
                    button {
                        class: if favorite() { "icon-button favorite active" } else { "icon-button favorite" },
                        title: if favorite() { "Remover dos favoritos" } else { "Favoritar" },
                        disabled: favorite_busy(),
                        onclick: toggle_favorite,
                        Icon { icon: FaHeart, width: 18, height: 18 }
                    }
                    if is_organizer {
                        Link { to: Route::EventEdit { id }, class: "btn btn-outline", "Editar" }
                    }
                }
            }

            ul { class: "event-facts",
                li {
                    Icon { icon: FaCalendarDays, width: 14, height: 14 }
                    " {format::event_date(event.date)}"
                }
                li {
                    Icon { icon: FaLocationDot, width: 14, height: 14 }
                    " {event.location}"
                    if let Some(p) = point {
                        " · "
                        a { href: "{osm_link(p, 16)}", target: "_blank", rel: "noopener", "ver no mapa" }
                    }
                }
                if let Some(capacity) = event.capacity {
                    li {
                        Icon { icon: FaUsers, width: 14, height: 14 }
                        " Capacidade: {capacity}"
                    }
                }
            }

            if let Some(organizer) = organizer {
                Link { to: Route::ProfileView { id: organizer.id }, class: "organizer",
                    Avatar { url: organizer.avatar_url.clone(), name: organizer.display_name().to_string(), size: 32 }
                    span { "Organizado por {organizer.display_name()}" }
                }
            }

            if let Some(description) = event.description.clone() {
                Markdown { source: description }
            }

            if let Some(url) = map_url {
                iframe { class: "event-map", src: "{url}", title: "Mapa do local" }
            }

            div { class: "purchase-bar",
                span { class: "price",
                    if event.is_free() { "Gratuito" } else { "{event.price()}" }
                }
                if is_past {
                    Button { variant: ButtonVariant::Secondary, disabled: true, "Evento encerrado" }
                } else {
                    Link {
                        to: Route::CheckoutTickets { event_id: id },
                        class: "btn btn-primary",
                        if event.is_free() { "Garantir ingresso" } else { "Comprar ingresso" }
                    }
                }
            }
        }
    }
}
