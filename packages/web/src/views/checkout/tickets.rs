use api::checkout::MAX_TICKETS_PER_ORDER;
use api::CheckoutStep;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::icons::{FaMinus, FaPlus};
use ui::{use_checkout, Icon};

use super::{advance, edit_draft, unit_price_label, OrderSummary, StepNav};
use crate::views::message_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Full,
    Half,
}

#[component]
fn Stepper(kind: Kind, value: u32, can_add: bool) -> Element {
    let checkout = use_checkout();
    let set = move |quantity: u32| {
        edit_draft(checkout, |draft| {
            match kind {
                Kind::Full => draft.set_full_quantity(quantity),
                Kind::Half => draft.set_half_quantity(quantity),
            };
        });
    };

    rsx! {
        div { class: "stepper",
            button {
                class: "icon-button",
                r#type: "button",
                title: "Remover",
                disabled: value == 0,
                onclick: move |_| set(value.saturating_sub(1)),
                Icon { icon: FaMinus, width: 12, height: 12 }
            }
            span { class: "stepper-value", "{value}" }
            button {
                class: "icon-button",
                r#type: "button",
                title: "Adicionar",
                disabled: !can_add,
                onclick: move |_| set(value + 1),
                Icon { icon: FaPlus, width: 12, height: 12 }
            }
        }
    }
}

#[component]
pub fn CheckoutTickets(event_id: Uuid) -> Element {
    let checkout = use_checkout();
    let nav = use_navigator();
    let mut invalid = use_signal(|| None::<api::ValidationError>);

    let Some(draft) = checkout.read().draft.clone() else {
        return rsx! {};
    };
    let can_add = draft.quantity() < MAX_TICKETS_PER_ORDER;

    let on_continue = move |_: ()| {
        let Some(draft) = checkout.peek().draft.clone() else {
            return;
        };
        invalid.set(advance(nav, &draft, CheckoutStep::Tickets).err());
    };

    rsx! {
        h2 { "Escolha seus ingressos" }
        ul { class: "ticket-options",
            li { class: "ticket-option",
                div {
                    strong { "Inteira" }
                    p { class: "muted", {unit_price_label(draft.unit_price)} }
                }
                Stepper { kind: Kind::Full, value: draft.full_quantity(), can_add }
            }
            li { class: "ticket-option",
                div {
                    strong { "Meia-entrada" }
                    p { class: "muted", {unit_price_label(draft.half_price())} }
                    p { class: "hint", "Estudantes, idosos e pessoas com deficiência, com documento na entrada." }
                }
                Stepper { kind: Kind::Half, value: draft.half_quantity(), can_add }
            }
        }
        p { class: "hint", "Até {MAX_TICKETS_PER_ORDER} ingressos por pedido." }
        if let Some(msg) = message_for(&invalid(), "quantity") {
            p { class: "field-error", "{msg}" }
        }
        if draft.quantity() > 0 {
            OrderSummary { draft: draft.clone() }
        }
        StepNav {
            step: CheckoutStep::Tickets,
            event_id,
            free: draft.is_free(),
            on_continue,
        }
    }
}
