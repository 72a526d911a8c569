use api::models::Event;
use dioxus::prelude::*;

use crate::format;
use crate::icons::{FaCalendarDays, FaLocationDot};
use crate::Icon;

/// Event summary in the lists, linking to the detail page.
/// `distance` is shown after the location when not empty.
#[component]
pub fn EventCard(event: Event, #[props(default)] distance: String) -> Element {
    let price = if event.is_free() {
        "Gratuito".to_string()
    } else {
        event.price().to_string()
    };

    rsx! {
        Link { to: "/eventos/{event.id}", class: "event-card",
            if let Some(url) = &event.image_url {
                img { class: "event-card-cover", src: "{url}", alt: "{event.title}" }
            } else {
                div { class: "event-card-cover event-card-cover--empty" }
            }
            div { class: "event-card-body",
                span { class: "event-card-category", "{event.category}" }
                h3 { class: "event-card-title", "{event.title}" }
                p { class: "event-card-meta",
                    Icon { icon: FaCalendarDays, width: 12, height: 12 }
                    " {format::event_date(event.date)}"
                }
                p { class: "event-card-meta",
                    Icon { icon: FaLocationDot, width: 12, height: 12 }
                    " {event.location}"
                    if !distance.is_empty() {
                        span { class: "event-card-distance", " · {distance}" }
                    }
                }
                span { class: if event.is_free() { "event-card-price free" } else { "event-card-price" }, "{price}" }
            }
        }
    }
}
