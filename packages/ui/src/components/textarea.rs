use dioxus::prelude::*;

#[component]
pub fn Textarea(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default)] value: String,
    #[props(default)] placeholder: String,
    #[props(default = 4)] rows: u32,
    #[props(default)] maxlength: Option<u32>,
    #[props(default)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        textarea {
            id: if !id.is_empty() { "{id}" },
            class: "textarea {class}",
            value: "{value}",
            placeholder,
            rows: "{rows}",
            maxlength: maxlength.map(|m| m.to_string()),
            disabled,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}
