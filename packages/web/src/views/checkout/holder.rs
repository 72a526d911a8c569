use api::validate::format_cpf;
use api::CheckoutStep;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{Input, Label};
use ui::{use_auth, use_checkout};

use super::{advance, edit_draft, StepNav};
use crate::views::message_for;

#[component]
pub fn CheckoutHolder(event_id: Uuid) -> Element {
    let auth = use_auth();
    let checkout = use_checkout();
    let nav = use_navigator();
    let mut invalid = use_signal(|| None::<api::ValidationError>);

    // Start from the signed-in user's own details
    use_hook(move || {
        let (name, email) = {
            let auth = auth.peek();
            (auth.display_name(), auth.email().unwrap_or_default().to_string())
        };
        edit_draft(checkout, |draft| {
            if draft.holder.name.is_empty() && draft.holder.email.is_empty() {
                draft.holder.name = name;
                draft.holder.email = email;
            }
        });
    });

    let Some(draft) = checkout.read().draft.clone() else {
        return rsx! {};
    };
    let holder = draft.holder.clone();

    let on_continue = move |_: ()| {
        let Some(draft) = checkout.peek().draft.clone() else {
            return;
        };
        invalid.set(advance(nav, &draft, CheckoutStep::Holder).err());
    };

    rsx! {
        h2 { "Dados do titular" }
        p { class: "hint", "Os ingressos são emitidos em nome desta pessoa." }
        form { class: "form-card", onsubmit: move |evt: FormEvent| evt.prevent_default(),
            div { class: "field",
                Label { html_for: "holder-name", "Nome completo" }
                Input {
                    id: "holder-name",
                    autocomplete: "name",
                    value: holder.name.clone(),
                    invalid: message_for(&invalid(), "name").is_some(),
                    oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.holder.name = evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "name") {
                    p { class: "field-error", "{msg}" }
                }
            }
            div { class: "field",
                Label { html_for: "holder-email", "E-mail" }
                Input {
                    id: "holder-email",
                    r#type: "email",
                    autocomplete: "email",
                    value: holder.email.clone(),
                    invalid: message_for(&invalid(), "email").is_some(),
                    oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.holder.email = evt.value()),
                }
                if let Some(msg) = message_for(&invalid(), "email") {
                    p { class: "field-error", "{msg}" }
                }
            }
            div { class: "field",
                Label { html_for: "holder-document", "CPF" }
                Input {
                    id: "holder-document",
                    inputmode: "numeric",
                    placeholder: "000.000.000-00",
                    maxlength: 14,
                    value: holder.document.clone(),
                    invalid: message_for(&invalid(), "document").is_some(),
                    oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.holder.document = format_cpf(&evt.value())),
                }
                if let Some(msg) = message_for(&invalid(), "document") {
                    p { class: "field-error", "{msg}" }
                }
            }
        }
        StepNav {
            step: CheckoutStep::Holder,
            event_id,
            free: draft.is_free(),
            on_continue,
        }
    }
}
