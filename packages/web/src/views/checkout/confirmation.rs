use api::models::Ticket;
use api::services::tickets;
use api::CheckoutStep;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{use_toast, ErrorBanner, ToastOptions};
use ui::{draft_slot, format, use_backend, use_checkout};

use super::{step_route, OrderSummary, StepNav};
use crate::views::tickets::TicketRow;
use crate::Route;

#[component]
pub fn CheckoutConfirmation(event_id: Uuid) -> Element {
    let backend = use_backend();
    let checkout = use_checkout();
    let toast = use_toast();
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);
    let mut purchased = use_signal(|| Option::<Vec<Ticket>>::None);

    if let Some(issued) = purchased() {
        let email = issued.first().map(|t| t.holder_email.clone()).unwrap_or_default();
        return rsx! {
            div { class: "purchase-done",
                h2 { "Compra confirmada!" }
                p { "Enviamos os ingressos para {email}." }
                ul { class: "list",
                    for ticket in issued.iter().cloned() {
                        TicketRow { key: "{ticket.id}", ticket }
                    }
                }
                Link { to: Route::MyTickets {}, class: "btn btn-primary", "Ver meus ingressos" }
            }
        };
    }

    let Some(draft) = checkout.read().draft.clone() else {
        return rsx! {};
    };

    let on_continue = move |_: ()| {
        if loading() {
            return;
        }
        let Some(draft) = checkout.peek().draft.clone() else {
            return;
        };
        let request = match draft.to_purchase_request(format::today()) {
            Ok(request) => request,
            Err(e) => {
                error.set(Some(e.message));
                return;
            }
        };
        let backend = backend.clone();
        spawn(async move {
            error.set(None);
            loading.set(true);
            let result = tickets::purchase(&backend, &request).await;
            loading.set(false);
            match result {
                Ok(issued) => {
                    tracing::info!(event = %event_id, count = issued.len(), "tickets purchased");
                    if let Err(e) = draft_slot(event_id).clear().await {
                        tracing::warn!("could not clear checkout draft: {e}");
                    }
                    toast.success("Compra realizada com sucesso".to_string(), ToastOptions::new());
                    purchased.set(Some(issued));
                }
                Err(e) => {
                    tracing::error!(event = %event_id, "purchase failed: {e}");
                    error.set(Some(format::backend_error(&e)));
                }
            }
        });
    };

    let holder = &draft.holder;
    let label = match (loading(), draft.is_free()) {
        (true, _) => "Processando...",
        (false, true) => "Confirmar inscrição",
        (false, false) => "Confirmar compra",
    };

    rsx! {
        h2 { "Confira seu pedido" }
        ErrorBanner { message: error() }
        section { class: "form-card",
            h3 { "Ingressos" }
            OrderSummary { draft: draft.clone() }
        }
        section { class: "form-card",
            div { class: "section-header",
                h3 { "Titular" }
                Link { to: step_route(CheckoutStep::Holder, event_id), "Alterar" }
            }
            p { "{holder.name}" }
            p { class: "muted", "{holder.email} · CPF {holder.document}" }
        }
        if !draft.is_free() {
            section { class: "form-card",
                div { class: "section-header",
                    h3 { "Pagamento" }
                    Link { to: step_route(CheckoutStep::Payment, event_id), "Alterar" }
                }
                match draft.payment {
                    Some(api::PaymentChoice::Card) => rsx! {
                        p { "Cartão de crédito final {draft.card.last_four()}" }
                    },
                    Some(choice) => rsx! { p { "{choice.label()}" } },
                    None => rsx! {},
                }
            }
        }
        StepNav {
            step: CheckoutStep::Confirmation,
            event_id,
            free: draft.is_free(),
            label: label.to_string(),
            disabled: loading(),
            on_continue,
        }
    }
}
