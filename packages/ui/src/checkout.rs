//! Checkout draft context shared by the four checkout pages.
//!
//! The draft is persisted per event on every change, so a reload resumes the
//! purchase. Card details are never persisted and have to be typed again.

use api::models::Event;
use api::services::events;
use api::CheckoutDraft;
use dioxus::prelude::*;
use uuid::Uuid;

use crate::{draft_slot, use_backend};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutState {
    pub event_id: Uuid,
    pub event: Option<Event>,
    pub draft: Option<CheckoutDraft>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CheckoutState {
    fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            event: None,
            draft: None,
            loading: true,
            error: None,
        }
    }
}

pub fn use_checkout() -> Signal<CheckoutState> {
    use_context::<Signal<CheckoutState>>()
}

/// Pick up a stored draft when it still matches the event; the event's current
/// price always wins.
fn resume(stored: Option<CheckoutDraft>, event: &Event) -> CheckoutDraft {
    match stored {
        Some(mut draft) if draft.event_id == event.id => {
            draft.unit_price = event.price();
            draft
        }
        _ => CheckoutDraft::for_event(event),
    }
}

/// Loads the event and its draft. Key it by `event_id` so a different event
/// starts from a fresh provider.
#[component]
pub fn CheckoutProvider(event_id: Uuid, children: Element) -> Element {
    let backend = use_backend();
    let mut state = use_signal(|| CheckoutState::new(event_id));

    let _ = use_resource(move || {
        let backend = backend.clone();
        async move {
            let event = match events::get(&backend, event_id).await {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(event = %event_id, "failed to load event for checkout: {e}");
                    let mut s = state.write();
                    s.loading = false;
                    s.error = Some(crate::format::backend_error(&e));
                    return;
                }
            };
            let stored = draft_slot(event_id).load().await.unwrap_or_else(|e| {
                tracing::warn!("could not read checkout draft: {e}");
                None
            });
            let draft = resume(stored, &event);
            state.set(CheckoutState {
                event_id,
                event: Some(event),
                draft: Some(draft),
                loading: false,
                error: None,
            });
        }
    });

    // Persist every change to the draft
    use_effect(move || {
        let Some(draft) = state.read().draft.clone() else {
            return;
        };
        spawn(async move {
            if let Err(e) = draft_slot(draft.event_id).save(&draft).await {
                tracing::warn!("could not persist checkout draft: {e}");
            }
        });
    });

    use_context_provider(|| state);

    rsx! {
        {children}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::Money;

    fn event(id: u128, price: f64) -> Event {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::from_u128(id),
            "title": "Show",
            "description": null,
            "date": "2030-01-01T20:00:00Z",
            "location": "Arena",
            "latitude": null,
            "longitude": null,
            "price": price,
            "category": "Música",
            "organizer_id": uuid::Uuid::nil(),
            "image_url": null,
            "capacity": null,
            "created_at": null
        }))
        .unwrap()
    }

    #[test]
    fn test_resume_keeps_quantities_and_takes_current_price() {
        let e = event(1, 60.0);
        let mut stored = CheckoutDraft::new(e.id, Money::from_cents(5000));
        stored.set_full_quantity(3);
        let draft = resume(Some(stored), &e);
        assert_eq!(draft.full_quantity(), 3);
        assert_eq!(draft.unit_price, Money::from_cents(6000));
    }

    #[test]
    fn test_resume_ignores_other_events() {
        let e = event(1, 10.0);
        let mut stored = CheckoutDraft::new(Uuid::from_u128(2), Money::from_cents(1000));
        stored.set_full_quantity(3);
        assert_eq!(resume(Some(stored), &e).quantity(), 0);
        assert_eq!(resume(None, &e).event_id, e.id);
    }
}
