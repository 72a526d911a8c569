//! # Ticket checkout
//!
//! Four pages under `/compra-ingresso/:event_id`, one per [`CheckoutStep`].
//! [`CheckoutLayout`] loads the event and the draft once for all of them and
//! sends the user back to the first step that still needs data when they open a
//! later page directly, e.g. after a reload dropped the card details. Free events
//! skip the payment page.

use api::{CheckoutDraft, CheckoutStep, Money};
use chrono::Utc;
use dioxus::prelude::*;
use dioxus::router::Navigator;
use uuid::Uuid;
use ui::components::{ErrorBanner, Spinner};
use ui::{format, use_checkout, CheckoutProvider};

use crate::Route;

mod confirmation;
mod holder;
mod payment;
mod tickets;

pub use confirmation::CheckoutConfirmation;
pub use holder::CheckoutHolder;
pub use payment::CheckoutPayment;
pub use tickets::CheckoutTickets;

pub(crate) fn step_route(step: CheckoutStep, event_id: Uuid) -> Route {
    match step {
        CheckoutStep::Tickets => Route::CheckoutTickets { event_id },
        CheckoutStep::Holder => Route::CheckoutHolder { event_id },
        CheckoutStep::Payment => Route::CheckoutPayment { event_id },
        CheckoutStep::Confirmation => Route::CheckoutConfirmation { event_id },
    }
}

fn step_of(route: &Route) -> Option<CheckoutStep> {
    match route {
        Route::CheckoutTickets { .. } => Some(CheckoutStep::Tickets),
        Route::CheckoutHolder { .. } => Some(CheckoutStep::Holder),
        Route::CheckoutPayment { .. } => Some(CheckoutStep::Payment),
        Route::CheckoutConfirmation { .. } => Some(CheckoutStep::Confirmation),
        _ => None,
    }
}

/// Steps shown for this purchase.
fn visible_steps(free: bool) -> Vec<CheckoutStep> {
    CheckoutStep::ALL
        .into_iter()
        .filter(|&step| !(free && step == CheckoutStep::Payment))
        .collect()
}

fn step_class(step: CheckoutStep, current: CheckoutStep) -> &'static str {
    match step.cmp(&current) {
        std::cmp::Ordering::Equal => "step current",
        std::cmp::Ordering::Less => "step done",
        std::cmp::Ordering::Greater => "step",
    }
}

fn next_step(step: CheckoutStep, free: bool) -> Option<CheckoutStep> {
    visible_steps(free).into_iter().find(|&s| s > step)
}

fn previous_step(step: CheckoutStep, free: bool) -> Option<CheckoutStep> {
    visible_steps(free).into_iter().rev().find(|&s| s < step)
}

/// Apply `f` to the draft, if one is loaded.
pub(crate) fn edit_draft(mut checkout: Signal<ui::CheckoutState>, f: impl FnOnce(&mut CheckoutDraft)) {
    if let Some(draft) = checkout.write().draft.as_mut() {
        f(draft);
    }
}

#[component]
pub fn CheckoutLayout(event_id: Uuid) -> Element {
    rsx! {
        CheckoutProvider { key: "{event_id}", event_id, CheckoutGate {} }
    }
}

#[component]
fn CheckoutGate() -> Element {
    let checkout = use_checkout();
    let route = use_route::<Route>();
    let nav = use_navigator();

    let state = checkout.read();
    if state.loading {
        return rsx! { Spinner {} };
    }
    if let Some(error) = &state.error {
        return rsx! {
            ErrorBanner { message: Some(error.clone()) }
            Link { to: Route::EventList {}, "Voltar aos eventos" }
        };
    }
    let (Some(event), Some(draft)) = (&state.event, &state.draft) else {
        return rsx! {};
    };

    if !event.is_upcoming(Utc::now()) {
        return rsx! {
            h1 { "{event.title}" }
            p { class: "empty", "Este evento já aconteceu. As vendas estão encerradas." }
            Link { to: Route::EventDetail { id: event.id }, "Voltar ao evento" }
        };
    }

    let step = step_of(&route).unwrap_or(CheckoutStep::Tickets);
    let today = format::today();
    if !draft.can_enter(step, today) {
        let target = draft.first_incomplete_step(today);
        tracing::debug!(?step, ?target, "checkout step not reachable yet");
        nav.replace(step_route(target, event.id));
        return rsx! {};
    }

    let event_id = event.id;
    let free = draft.is_free();
    let reachable = draft.first_incomplete_step(today);

    rsx! {
        div { class: "checkout",
            header { class: "checkout-header",
                Link { to: Route::EventDetail { id: event_id }, class: "muted", "← {event.title}" }
                p { class: "muted", "{format::event_date(event.date)} · {event.location}" }
            }
            ol { class: "steps",
                for (i, s) in visible_steps(free).into_iter().enumerate() {
                    li {
                        key: "{s:?}",
                        class: step_class(s, step),
                        if s <= reachable && s != step {
                            Link { to: step_route(s, event_id), "{i + 1}. {s.title()}" }
                        } else {
                            span { "{i + 1}. {s.title()}" }
                        }
                    }
                }
            }
            Outlet::<Route> {}
        }
    }
}

/// Subtotal, fee and total of the draft.
#[component]
pub(crate) fn OrderSummary(draft: CheckoutDraft) -> Element {
    let half = draft.half_quantity();
    let full = draft.full_quantity();
    rsx! {
        dl { class: "order-summary",
            if full > 0 {
                dt { "{full} × Inteira" }
                dd { "{draft.unit_price * full}" }
            }
            if half > 0 {
                dt { "{half} × Meia-entrada" }
                dd { "{draft.half_price() * half}" }
            }
            if draft.is_free() {
                dt { class: "total", "Total" }
                dd { class: "total", "Gratuito" }
            } else {
                dt { "Subtotal" }
                dd { "{draft.subtotal()}" }
                dt { "Taxa de serviço" }
                dd { "{draft.service_fee()}" }
                dt { class: "total", "Total" }
                dd { class: "total", "{draft.total()}" }
            }
        }
    }
}

/// Back and continue buttons of a step page.
#[component]
pub(crate) fn StepNav(
    step: CheckoutStep,
    event_id: Uuid,
    free: bool,
    #[props(default = "Continuar".to_string())] label: String,
    #[props(default)] disabled: bool,
    on_continue: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "step-nav",
            if let Some(previous) = previous_step(step, free) {
                Link { to: step_route(previous, event_id), class: "btn btn-ghost", "Voltar" }
            } else {
                span {}
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled,
                onclick: move |_| on_continue.call(()),
                "{label}"
            }
        }
    }
}

/// Go to the step after `step`, once it validates.
pub(crate) fn advance(
    nav: Navigator,
    draft: &CheckoutDraft,
    step: CheckoutStep,
) -> Result<(), api::ValidationError> {
    draft.validate_step(step, format::today())?;
    if let Some(next) = next_step(step, draft.is_free()) {
        nav.push(step_route(next, draft.event_id));
    }
    Ok(())
}

fn unit_price_label(price: Money) -> String {
    if price.is_zero() {
        "Gratuito".to_string()
    } else {
        price.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_routes() {
        let id = Uuid::from_u128(3);
        for step in CheckoutStep::ALL {
            assert_eq!(step_of(&step_route(step, id)), Some(step));
        }
        assert_eq!(step_of(&Route::Feed {}), None);
        assert_eq!(
            step_route(CheckoutStep::Holder, id).to_string(),
            format!("/compra-ingresso/{id}/dados")
        );
    }

    #[test]
    fn test_free_events_skip_payment() {
        assert_eq!(visible_steps(true).len(), 3);
        assert_eq!(next_step(CheckoutStep::Holder, true), Some(CheckoutStep::Confirmation));
        assert_eq!(next_step(CheckoutStep::Holder, false), Some(CheckoutStep::Payment));
        assert_eq!(previous_step(CheckoutStep::Confirmation, true), Some(CheckoutStep::Holder));
        assert_eq!(previous_step(CheckoutStep::Tickets, false), None);
        assert_eq!(next_step(CheckoutStep::Confirmation, false), None);
    }

    #[test]
    fn test_unit_price_label() {
        assert_eq!(unit_price_label(Money::ZERO), "Gratuito");
        assert_eq!(unit_price_label(Money::from_cents(5000)), "R$ 50,00");
    }
}
