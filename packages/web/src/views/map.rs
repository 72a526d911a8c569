//! Events on a map, nearest first.

use api::geo::{format_distance, osm_embed_url, sort_by_distance, BoundingBox, Coordinates, DEFAULT_CENTER};
use api::models::EventFilter;
use api::services::events;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{ErrorBanner, Spinner};
use ui::icons::FaLocationCrosshairs;
use ui::{format, geolocation, use_backend, EventCard, Icon};

/// Framing margin around the plotted points, in degrees.
const MIN_MARGIN: f64 = 0.01;

#[component]
pub fn EventMap() -> Element {
    let backend = use_backend();
    let mut selected = use_signal(|| Option::<Uuid>::None);
    let mut locate = use_signal(|| 0u32);

    let events = use_resource(move || {
        let backend = backend.clone();
        async move {
            let filter = EventFilter {
                with_coordinates: true,
                ..EventFilter::upcoming()
            };
            events::list(&backend, &filter).await
        }
    });

    // Re-run to ask for the position again
    let position = use_resource(move || {
        locate();
        async move { geolocation::current_position().await }
    });

    let list = match &*events.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            tracing::error!("failed to load events for the map: {e}");
            return rsx! { ErrorBanner { message: Some(format::backend_error(e)) } };
        }
        Some(Ok(list)) => list.clone(),
    };
    let user = position().flatten();

    let points: Vec<Coordinates> = list.iter().filter_map(Coordinates::of).collect();
    let origin = user
        .or_else(|| BoundingBox::around(points.iter().copied()).map(|b| b.center()))
        .unwrap_or(DEFAULT_CENTER);
    let ranked = sort_by_distance(&list, origin);

    let focus = selected().and_then(|id| list.iter().find(|e| e.id == id)).and_then(Coordinates::of);
    let bbox = match focus {
        Some(point) => BoundingBox::around([point]),
        None => BoundingBox::around(points.iter().copied().chain(user)),
    }
    .unwrap_or(BoundingBox {
        min_lat: origin.latitude,
        min_lon: origin.longitude,
        max_lat: origin.latitude,
        max_lon: origin.longitude,
    })
    .padded(0.15, MIN_MARGIN);
    let map_url = osm_embed_url(bbox, focus.or(user));

    rsx! {
        div { class: "page-header",
            h1 { "Mapa" }
            button {
                class: "btn btn-outline",
                onclick: move |_| locate += 1,
                Icon { icon: FaLocationCrosshairs, width: 14, height: 14 }
                " Minha localização"
            }
        }
        div { class: "map-layout",
            iframe { class: "map-frame", src: "{map_url}", title: "Mapa de eventos" }
            div { class: "map-list",
                if user.is_none() {
                    p { class: "muted", "Permita o acesso à localização para ver as distâncias a partir de você." }
                }
                if ranked.is_empty() {
                    p { class: "empty", "Nenhum evento com localização." }
                }
                for (event, km) in ranked.into_iter().map(|(e, km)| (e.clone(), km)) {
                    div {
                        key: "{event.id}",
                        class: if selected() == Some(event.id) { "map-item selected" } else { "map-item" },
                        onmouseenter: move |_| selected.set(Some(event.id)),
                        EventCard { distance: format_distance(km), event: event.clone() }
                    }
                }
            }
        }
    }
}
