use api::models::profile::initials;
use dioxus::prelude::*;

/// Round profile picture, falling back to the name's initials.
#[component]
pub fn Avatar(
    #[props(!optional)] url: Option<String>,
    name: String,
    #[props(default = 40)] size: u32,
    #[props(default)] class: String,
) -> Element {
    let style = format!("width: {size}px; height: {size}px; font-size: {}px;", size * 2 / 5);
    rsx! {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            img {
                class: "avatar {class}",
                style: "{style}",
                src: "{url}",
                alt: "{name}",
            }
        } else {
            span {
                class: "avatar avatar-fallback {class}",
                style: "{style}",
                aria_label: "{name}",
                "{initials(&name)}"
            }
        }
    }
}
