use dioxus::prelude::*;

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] value: String,
    #[props(default)] placeholder: String,
    #[props(default)] autocomplete: String,
    #[props(default)] inputmode: String,
    #[props(default)] maxlength: Option<u32>,
    #[props(default)] min: String,
    #[props(default)] max: String,
    #[props(default)] step: String,
    #[props(default)] disabled: bool,
    #[props(default)] required: bool,
    /// Marks the field invalid for styling and assistive tech.
    #[props(default)] invalid: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        input {
            id: if !id.is_empty() { "{id}" },
            class: "input {class}",
            r#type: "{r#type}",
            value: "{value}",
            placeholder,
            autocomplete: if !autocomplete.is_empty() { "{autocomplete}" },
            inputmode: if !inputmode.is_empty() { "{inputmode}" },
            maxlength: maxlength.map(|m| m.to_string()),
            min: if !min.is_empty() { "{min}" },
            max: if !max.is_empty() { "{max}" },
            step: if !step.is_empty() { "{step}" },
            disabled,
            required,
            "aria-invalid": invalid,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}
