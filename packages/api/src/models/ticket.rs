//! Purchased tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::EventSummary;
use crate::money::Money;

/// Full price or half price (`meia-entrada`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketKind {
    #[serde(rename = "inteira")]
    Full,
    #[serde(rename = "meia")]
    Half,
}

impl TicketKind {
    pub fn label(self) -> &'static str {
        match self {
            TicketKind::Full => "Inteira",
            TicketKind::Half => "Meia-entrada",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Paid,
    Pending,
    Cancelled,
}

impl TicketStatus {
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Paid => "Pago",
            TicketStatus::Pending => "Aguardando pagamento",
            TicketStatus::Cancelled => "Cancelado",
        }
    }
}

/// A row in `tickets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub kind: TicketKind,
    pub holder_name: String,
    pub holder_email: String,
    /// Code presented at the entrance.
    pub code: String,
    pub status: TicketStatus,
    /// Amount paid in reais.
    #[serde(default)]
    pub total: f64,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventSummary>,
}

impl Ticket {
    pub fn total(&self) -> Money {
        Money::from_reais(self.total)
    }

    /// Whether the ticket still gets its holder in.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.status == TicketStatus::Paid
            && self.event.as_ref().is_none_or(|event| event.date >= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(status: &str, date: &str) -> Ticket {
        serde_json::from_value(json!({
            "id": "0b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d",
            "event_id": "1b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d",
            "user_id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
            "kind": "meia",
            "holder_name": "Ana",
            "holder_email": "ana@example.com",
            "code": "AGT-12345",
            "status": status,
            "total": 27.5,
            "payment_method": "pix",
            "created_at": "2025-02-01T10:00:00Z",
            "event": {
                "id": "1b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d",
                "title": "Show",
                "date": date,
                "location": "Arena"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_and_total() {
        let t = ticket("paid", "2030-01-01T20:00:00Z");
        assert_eq!(t.kind, TicketKind::Half);
        assert_eq!(t.kind.label(), "Meia-entrada");
        assert_eq!(t.total(), Money::from_cents(2750));
    }

    #[test]
    fn test_validity() {
        let now = "2026-01-01T00:00:00Z".parse().unwrap();
        assert!(ticket("paid", "2030-01-01T20:00:00Z").is_valid(now));
        assert!(!ticket("cancelled", "2030-01-01T20:00:00Z").is_valid(now));
        assert!(!ticket("paid", "2020-01-01T20:00:00Z").is_valid(now));
    }
}
