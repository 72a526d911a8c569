use dioxus::prelude::*;

#[component]
pub fn Spinner(#[props(default = "Carregando...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "spinner", role: "status",
            span { class: "spinner-dot" }
            span { class: "spinner-label", "{label}" }
        }
    }
}

/// Inline error box; renders nothing without a message.
#[component]
pub fn ErrorBanner(#[props(!optional)] message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            div { class: "error-banner", role: "alert", "{message}" }
        }
    }
}
