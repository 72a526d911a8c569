//! The user's tickets.

use api::models::{Ticket, TicketStatus};
use api::services::tickets;
use chrono::Utc;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{ErrorBanner, Spinner};
use ui::icons::FaTicket;
use ui::{format, use_auth, use_backend, Icon};

use crate::Route;

fn status_class(ticket: &Ticket) -> &'static str {
    match ticket.status {
        TicketStatus::Paid if ticket.is_valid(Utc::now()) => "status status-paid",
        TicketStatus::Paid => "status status-past",
        TicketStatus::Pending => "status status-pending",
        TicketStatus::Cancelled => "status status-cancelled",
    }
}

#[component]
pub fn MyTickets() -> Element {
    let auth = use_auth();
    let backend = use_backend();

    let list = use_resource(move || {
        let backend = backend.clone();
        async move {
            let me = auth().user_id()?;
            Some(tickets::mine(&backend, me).await)
        }
    });

    rsx! {
        h1 { "Meus ingressos" }
        match &*list.read() {
            None | Some(None) => rsx! { Spinner {} },
            Some(Some(Err(e))) => {
                tracing::error!("failed to load tickets: {e}");
                rsx! { ErrorBanner { message: Some(format::backend_error(e)) } }
            }
            Some(Some(Ok(items))) if items.is_empty() => rsx! {
                p { class: "empty",
                    "Você ainda não comprou ingressos. "
                    Link { to: Route::EventList {}, "Encontrar eventos" }
                }
            },
            Some(Some(Ok(items))) => rsx! {
                ul { class: "list",
                    for ticket in items.iter().cloned() {
                        TicketRow { key: "{ticket.id}", ticket }
                    }
                }
            },
        }
    }
}

#[component]
pub(crate) fn TicketRow(ticket: Ticket) -> Element {
    let title = ticket
        .event
        .as_ref()
        .map(|e| e.title.clone())
        .unwrap_or_else(|| "Evento".to_string());

    rsx! {
        li { class: "list-item",
            Link { to: Route::TicketDetail { id: ticket.id }, class: "list-item-main",
                span { class: "ticket-icon", Icon { icon: FaTicket, width: 18, height: 18 } }
                div {
                    strong { "{title}" }
                    p { class: "muted",
                        "{ticket.kind.label()} · {ticket.holder_name}"
                        if let Some(event) = &ticket.event {
                            " · {format::event_date(event.date)}"
                        }
                    }
                }
                span { class: status_class(&ticket), "{ticket.status.label()}" }
            }
        }
    }
}

#[component]
pub fn TicketDetail(id: Uuid) -> Element {
    let backend = use_backend();
    let ticket = use_resource(use_reactive!(|id| {
        let backend = backend.clone();
        async move { tickets::get(&backend, id).await }
    }));

    let ticket = match &*ticket.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            tracing::error!(ticket = %id, "failed to load ticket: {e}");
            return rsx! { ErrorBanner { message: Some(format::backend_error(e)) } };
        }
        Some(Ok(ticket)) => ticket.clone(),
    };

    rsx! {
        div { class: "page-header",
            h1 { "Ingresso" }
            Link { to: Route::MyTickets {}, class: "btn btn-ghost", "Todos os ingressos" }
        }
        article { class: "ticket-card",
            if let Some(event) = &ticket.event {
                if let Some(url) = &event.image_url {
                    img { class: "ticket-cover", src: "{url}", alt: "" }
                }
                h2 {
                    Link { to: Route::EventDetail { id: event.id }, "{event.title}" }
                }
                p { class: "muted", "{format::event_date(event.date)} · {event.location}" }
            }
            div { class: "ticket-code",
                span { class: "label", "Código" }
                code { "{ticket.code}" }
            }
            dl { class: "facts",
                dt { "Situação" }
                dd { span { class: status_class(&ticket), "{ticket.status.label()}" } }
                dt { "Tipo" }
                dd { "{ticket.kind.label()}" }
                dt { "Titular" }
                dd { "{ticket.holder_name}" }
                dt { "E-mail" }
                dd { "{ticket.holder_email}" }
                dt { "Valor" }
                dd { "{ticket.total()}" }
                if let Some(method) = &ticket.payment_method {
                    dt { "Pagamento" }
                    dd { {payment_label(method)} }
                }
                dt { "Comprado em" }
                dd { "{format::short_date(ticket.created_at)}" }
            }
        }
    }
}

/// Human label for a stored payment method such as `card:1111`.
fn payment_label(method: &str) -> String {
    match method.split_once(':') {
        Some(("card", last_four)) => format!("Cartão final {last_four}"),
        _ => match method {
            "pix" => "Pix".to_string(),
            "boleto" => "Boleto".to_string(),
            "free" => "Gratuito".to_string(),
            other => other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_label() {
        assert_eq!(payment_label("card:4242"), "Cartão final 4242");
        assert_eq!(payment_label("pix"), "Pix");
        assert_eq!(payment_label("free"), "Gratuito");
        assert_eq!(payment_label("crypto"), "crypto");
    }
}
