use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    tracing::debug!(%path, "no route matched");

    rsx! {
        div { class: "not-found",
            h1 { "404" }
            p { "A página "
                code { "{path}" }
                " não existe."
            }
            Link { to: Route::EventList {}, class: "btn btn-primary", "Ir para os eventos" }
        }
    }
}
