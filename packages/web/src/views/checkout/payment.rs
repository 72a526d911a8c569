use api::{CheckoutStep, PaymentChoice};
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{Input, Label};
use ui::use_checkout;

use super::{advance, edit_draft, OrderSummary, StepNav};
use crate::views::message_for;

/// `4111111111111111` as `4111 1111 1111 1111`.
fn group_card_number(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).take(19).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inserts the slash of `MM/AA` as the user types.
fn format_expiry(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[component]
pub fn CheckoutPayment(event_id: Uuid) -> Element {
    let checkout = use_checkout();
    let nav = use_navigator();
    let mut invalid = use_signal(|| None::<api::ValidationError>);

    let Some(draft) = checkout.read().draft.clone() else {
        return rsx! {};
    };
    let card = draft.card.clone();

    let on_continue = move |_: ()| {
        let Some(draft) = checkout.peek().draft.clone() else {
            return;
        };
        invalid.set(advance(nav, &draft, CheckoutStep::Payment).err());
    };

    let error_for = move |field: &str| message_for(&invalid(), field);

    rsx! {
        h2 { "Forma de pagamento" }
        OrderSummary { draft: draft.clone() }
        fieldset { class: "payment-choices",
            for choice in PaymentChoice::ALL {
                label { key: "{choice:?}", class: "radio",
                    input {
                        r#type: "radio",
                        name: "payment",
                        checked: draft.payment == Some(choice),
                        onchange: move |_| edit_draft(checkout, |d| d.payment = Some(choice)),
                    }
                    "{choice.label()}"
                }
            }
        }
        if let Some(msg) = error_for("payment") {
            p { class: "field-error", "{msg}" }
        }

        match draft.payment {
            Some(PaymentChoice::Card) => rsx! {
                form { class: "form-card", onsubmit: move |evt: FormEvent| evt.prevent_default(),
                    p { class: "hint", "Os dados do cartão não ficam salvos neste dispositivo." }
                    div { class: "field",
                        Label { html_for: "card-number", "Número do cartão" }
                        Input {
                            id: "card-number",
                            inputmode: "numeric",
                            autocomplete: "cc-number",
                            placeholder: "0000 0000 0000 0000",
                            value: card.number.clone(),
                            invalid: error_for("card_number").is_some(),
                            oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.card.number = group_card_number(&evt.value())),
                        }
                        if let Some(msg) = error_for("card_number") {
                            p { class: "field-error", "{msg}" }
                        }
                    }
                    div { class: "field",
                        Label { html_for: "card-holder", "Nome impresso no cartão" }
                        Input {
                            id: "card-holder",
                            autocomplete: "cc-name",
                            value: card.holder.clone(),
                            invalid: error_for("card_holder").is_some(),
                            oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.card.holder = evt.value().to_uppercase()),
                        }
                        if let Some(msg) = error_for("card_holder") {
                            p { class: "field-error", "{msg}" }
                        }
                    }
                    div { class: "field-row",
                        div { class: "field",
                            Label { html_for: "card-expiry", "Validade" }
                            Input {
                                id: "card-expiry",
                                inputmode: "numeric",
                                autocomplete: "cc-exp",
                                placeholder: "MM/AA",
                                maxlength: 5,
                                value: card.expiry.clone(),
                                invalid: error_for("card_expiry").is_some(),
                                oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.card.expiry = format_expiry(&evt.value())),
                            }
                            if let Some(msg) = error_for("card_expiry") {
                                p { class: "field-error", "{msg}" }
                            }
                        }
                        div { class: "field",
                            Label { html_for: "card-cvv", "CVV" }
                            Input {
                                id: "card-cvv",
                                r#type: "password",
                                inputmode: "numeric",
                                autocomplete: "cc-csc",
                                maxlength: 4,
                                value: card.cvv.clone(),
                                invalid: error_for("cvv").is_some(),
                                oninput: move |evt: FormEvent| edit_draft(checkout, |d| d.card.cvv = evt.value()),
                            }
                            if let Some(msg) = error_for("cvv") {
                                p { class: "field-error", "{msg}" }
                            }
                        }
                    }
                }
            },
            Some(PaymentChoice::Pix) => rsx! {
                p { class: "hint", "O código Pix é gerado ao confirmar a compra e vale por 30 minutos." }
            },
            Some(PaymentChoice::Boleto) => rsx! {
                p { class: "hint", "O boleto vence em 3 dias úteis. Os ingressos são liberados após a compensação." }
            },
            None => rsx! {},
        }

        StepNav {
            step: CheckoutStep::Payment,
            event_id,
            free: draft.is_free(),
            on_continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_card_number() {
        assert_eq!(group_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(group_card_number("4111 11"), "4111 11");
        assert_eq!(group_card_number(""), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("0"), "0");
        assert_eq!(format_expiry("052"), "05/2");
        assert_eq!(format_expiry("05/27"), "05/27");
        assert_eq!(format_expiry("052799"), "05/27");
    }
}
