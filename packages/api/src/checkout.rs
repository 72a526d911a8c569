//! # Ticket checkout
//!
//! The purchase flow runs over four pages, one per [`CheckoutStep`]. A
//! [`CheckoutDraft`] collects what each page asks for and decides which steps the
//! user may visit: a step is reachable only once every earlier step validates.
//!
//! Pricing is indicative; the `purchase_tickets` RPC charges the authoritative
//! amount. Card data stays in memory on the client: it is skipped when the draft is
//! persisted and only the payment method and last four digits reach the backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Event;
use crate::money::Money;
use crate::validate::{self, ValidationError};

/// Most tickets one order may contain.
pub const MAX_TICKETS_PER_ORDER: u32 = 10;

/// Service fee charged on the subtotal, in percent.
pub const SERVICE_FEE_PERCENT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    Tickets,
    Holder,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Tickets,
        CheckoutStep::Holder,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::Tickets => "Ingressos",
            CheckoutStep::Holder => "Dados",
            CheckoutStep::Payment => "Pagamento",
            CheckoutStep::Confirmation => "Confirmação",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Person the tickets are issued to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolderDetails {
    pub name: String,
    pub email: String,
    /// CPF.
    pub document: String,
}

impl HolderDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("name", "Nome", &self.name)?;
        validate::email(&self.email)?;
        validate::cpf(&self.document)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChoice {
    Pix,
    Card,
    Boleto,
}

impl PaymentChoice {
    pub const ALL: [PaymentChoice; 3] = [PaymentChoice::Pix, PaymentChoice::Card, PaymentChoice::Boleto];

    pub fn label(self) -> &'static str {
        match self {
            PaymentChoice::Pix => "Pix",
            PaymentChoice::Card => "Cartão de crédito",
            PaymentChoice::Boleto => "Boleto",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    /// `MM/AA`.
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        validate::card_number(&self.number)?;
        validate::required("card_holder", "Nome impresso no cartão", &self.holder)?;
        validate::card_expiry(&self.expiry, today)?;
        validate::cvv(&self.cvv)
    }

    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

/// State of one purchase in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredDraft")]
pub struct CheckoutDraft {
    pub event_id: Uuid,
    /// Unit price of a full ticket.
    pub unit_price: Money,
    full_quantity: u32,
    half_quantity: u32,
    pub holder: HolderDetails,
    pub payment: Option<PaymentChoice>,
    #[serde(skip)]
    pub card: CardDetails,
}

/// A draft as persisted; quantities are re-clamped on the way back in.
#[derive(Deserialize)]
struct StoredDraft {
    event_id: Uuid,
    unit_price: Money,
    #[serde(default)]
    full_quantity: u32,
    #[serde(default)]
    half_quantity: u32,
    #[serde(default)]
    holder: HolderDetails,
    #[serde(default)]
    payment: Option<PaymentChoice>,
}

impl From<StoredDraft> for CheckoutDraft {
    fn from(stored: StoredDraft) -> Self {
        let mut draft = CheckoutDraft::new(stored.event_id, stored.unit_price);
        draft.set_half_quantity(stored.half_quantity);
        draft.set_full_quantity(stored.full_quantity);
        draft.holder = stored.holder;
        draft.payment = stored.payment;
        draft
    }
}

impl CheckoutDraft {
    pub fn new(event_id: Uuid, unit_price: Money) -> Self {
        Self {
            event_id,
            unit_price,
            full_quantity: 0,
            half_quantity: 0,
            holder: HolderDetails::default(),
            payment: None,
            card: CardDetails::default(),
        }
    }

    pub fn for_event(event: &Event) -> Self {
        Self::new(event.id, event.price())
    }

    pub fn full_quantity(&self) -> u32 {
        self.full_quantity
    }

    pub fn half_quantity(&self) -> u32 {
        self.half_quantity
    }

    pub fn quantity(&self) -> u32 {
        self.full_quantity.saturating_add(self.half_quantity)
    }

    /// Set the number of full-price tickets, clamped so the order stays within
    /// [`MAX_TICKETS_PER_ORDER`]. Returns the value actually set.
    pub fn set_full_quantity(&mut self, quantity: u32) -> u32 {
        self.full_quantity = quantity.min(MAX_TICKETS_PER_ORDER.saturating_sub(self.half_quantity));
        self.full_quantity
    }

    pub fn set_half_quantity(&mut self, quantity: u32) -> u32 {
        self.half_quantity = quantity.min(MAX_TICKETS_PER_ORDER.saturating_sub(self.full_quantity));
        self.half_quantity
    }

    pub fn is_free(&self) -> bool {
        self.unit_price.is_zero()
    }

    pub fn half_price(&self) -> Money {
        self.unit_price.half()
    }

    pub fn subtotal(&self) -> Money {
        self.unit_price * self.full_quantity + self.half_price() * self.half_quantity
    }

    pub fn service_fee(&self) -> Money {
        self.subtotal().percent(SERVICE_FEE_PERCENT)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.service_fee()
    }

    /// Check the data a step asks for.
    pub fn validate_step(&self, step: CheckoutStep, today: NaiveDate) -> Result<(), ValidationError> {
        match step {
            CheckoutStep::Tickets => {
                if self.quantity() == 0 {
                    return Err(ValidationError::new("quantity", "Selecione pelo menos um ingresso"));
                }
                if self.quantity() > MAX_TICKETS_PER_ORDER {
                    return Err(ValidationError::new(
                        "quantity",
                        format!("Máximo de {MAX_TICKETS_PER_ORDER} ingressos por pedido"),
                    ));
                }
                Ok(())
            }
            CheckoutStep::Holder => self.holder.validate(),
            CheckoutStep::Payment if self.is_free() => Ok(()),
            CheckoutStep::Payment => match self.payment {
                None => Err(ValidationError::new("payment", "Escolha uma forma de pagamento")),
                Some(PaymentChoice::Card) => self.card.validate(today),
                Some(_) => Ok(()),
            },
            CheckoutStep::Confirmation => Ok(()),
        }
    }

    /// The earliest step whose data is missing or invalid; `Confirmation` when
    /// everything before it is complete.
    pub fn first_incomplete_step(&self, today: NaiveDate) -> CheckoutStep {
        CheckoutStep::ALL
            .into_iter()
            .find(|&step| self.validate_step(step, today).is_err())
            .unwrap_or(CheckoutStep::Confirmation)
    }

    pub fn can_enter(&self, step: CheckoutStep, today: NaiveDate) -> bool {
        step <= self.first_incomplete_step(today)
    }

    /// Arguments for the `purchase_tickets` RPC, once every step validates.
    pub fn to_purchase_request(&self, today: NaiveDate) -> Result<PurchaseRequest, ValidationError> {
        for step in CheckoutStep::ALL {
            self.validate_step(step, today)?;
        }
        let payment_method = match self.payment {
            _ if self.is_free() => "free".to_string(),
            Some(PaymentChoice::Card) => format!("card:{}", self.card.last_four()),
            Some(PaymentChoice::Pix) => "pix".to_string(),
            Some(PaymentChoice::Boleto) => "boleto".to_string(),
            None => return Err(ValidationError::new("payment", "Escolha uma forma de pagamento")),
        };
        Ok(PurchaseRequest {
            p_event_id: self.event_id,
            p_holder_name: self.holder.name.trim().to_string(),
            p_holder_email: self.holder.email.trim().to_string(),
            p_holder_document: self.holder.document.chars().filter(char::is_ascii_digit).collect(),
            p_full_quantity: self.full_quantity,
            p_half_quantity: self.half_quantity,
            p_payment_method: payment_method,
        })
    }
}

/// Arguments of the `purchase_tickets` RPC.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseRequest {
    pub p_event_id: Uuid,
    pub p_holder_name: String,
    pub p_holder_email: String,
    pub p_holder_document: String,
    pub p_full_quantity: u32,
    pub p_half_quantity: u32,
    pub p_payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 15).unwrap()
    }

    fn draft(price_cents: u64) -> CheckoutDraft {
        CheckoutDraft::new(Uuid::from_u128(7), Money::from_cents(price_cents))
    }

    fn holder() -> HolderDetails {
        HolderDetails {
            name: " Ana Souza ".to_string(),
            email: "ana@example.com".to_string(),
            document: "529.982.247-25".to_string(),
        }
    }

    #[test]
    fn test_quantities_are_capped_per_order() {
        let mut d = draft(5000);
        assert_eq!(d.set_full_quantity(7), 7);
        assert_eq!(d.set_half_quantity(6), 3);
        assert_eq!(d.quantity(), MAX_TICKETS_PER_ORDER);
        assert_eq!(d.set_full_quantity(12), 7);
        d.set_half_quantity(0);
        assert_eq!(d.set_full_quantity(12), 10);
    }

    #[test]
    fn test_pricing() {
        let mut d = draft(4999);
        d.set_full_quantity(2);
        d.set_half_quantity(1);
        // 2 x 49,99 + 25,00
        assert_eq!(d.subtotal(), Money::from_cents(12498));
        assert_eq!(d.service_fee(), Money::from_cents(1250));
        assert_eq!(d.total(), Money::from_cents(13748));
    }

    #[test]
    fn test_step_gating() {
        let mut d = draft(3000);
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Tickets);
        assert!(!d.can_enter(CheckoutStep::Holder, today()));

        d.set_half_quantity(1);
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Holder);
        assert!(d.can_enter(CheckoutStep::Holder, today()));

        d.holder = holder();
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Payment);

        d.payment = Some(PaymentChoice::Card);
        d.card.number = "4111 1111 1111 1111".to_string();
        d.card.holder = "ANA SOUZA".to_string();
        d.card.expiry = "01/26".to_string();
        d.card.cvv = "123".to_string();
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Payment);

        d.card.expiry = "01/27".to_string();
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Confirmation);
        assert!(d.can_enter(CheckoutStep::Confirmation, today()));
    }

    #[test]
    fn test_free_event_skips_payment() {
        let mut d = draft(0);
        d.set_full_quantity(2);
        d.holder = holder();
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Confirmation);
        let request = d.to_purchase_request(today()).unwrap();
        assert_eq!(request.p_payment_method, "free");
    }

    #[test]
    fn test_purchase_request_sends_only_last_four() {
        let mut d = draft(3000);
        d.set_full_quantity(1);
        d.holder = holder();
        d.payment = Some(PaymentChoice::Card);
        d.card = CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            holder: "ANA".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
        };
        let request = d.to_purchase_request(today()).unwrap();
        assert_eq!(request.p_payment_method, "card:1111");
        assert_eq!(request.p_holder_name, "Ana Souza");
        assert_eq!(request.p_holder_document, "52998224725");

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("4111 1111"));
    }

    #[test]
    fn test_persisted_draft_drops_card() {
        let mut d = draft(3000);
        d.set_full_quantity(1);
        d.payment = Some(PaymentChoice::Card);
        d.card.number = "4111111111111111".to_string();
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("4111111111111111"));

        let restored: CheckoutDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.full_quantity(), 1);
        assert_eq!(restored.card, CardDetails::default());
    }

    #[test]
    fn test_restored_draft_is_clamped_to_order_cap() {
        let json = serde_json::json!({
            "event_id": Uuid::from_u128(7),
            "unit_price": Money::from_cents(3000),
            "full_quantity": 4,
            "half_quantity": 15,
            "holder": holder(),
            "payment": "pix",
        });
        let mut d: CheckoutDraft = serde_json::from_value(json).unwrap();
        assert_eq!(d.half_quantity(), MAX_TICKETS_PER_ORDER);
        assert_eq!(d.full_quantity(), 0);
        assert!(d.quantity() <= MAX_TICKETS_PER_ORDER);

        assert_eq!(d.set_full_quantity(1), 0);
        assert_eq!(d.set_half_quantity(3), 3);
        assert_eq!(d.set_full_quantity(20), 7);
        let request = d.to_purchase_request(today()).unwrap();
        assert_eq!(request.p_full_quantity + request.p_half_quantity, MAX_TICKETS_PER_ORDER);
    }

    #[test]
    fn test_tickets_step_rejects_more_than_the_cap() {
        let mut d = draft(3000);
        d.full_quantity = 8;
        d.half_quantity = 5;
        let err = d.validate_step(CheckoutStep::Tickets, today()).unwrap_err();
        assert_eq!(err.field, "quantity");
        assert_eq!(d.first_incomplete_step(today()), CheckoutStep::Tickets);
        assert!(d.to_purchase_request(today()).is_err());
    }

    #[test]
    fn test_purchase_request_rejects_incomplete() {
        let d = draft(3000);
        assert_eq!(d.to_purchase_request(today()).unwrap_err().field, "quantity");
    }

    #[test]
    fn test_step_navigation() {
        assert_eq!(CheckoutStep::Tickets.next(), Some(CheckoutStep::Holder));
        assert_eq!(CheckoutStep::Confirmation.next(), None);
        assert_eq!(CheckoutStep::Tickets.previous(), None);
        assert_eq!(CheckoutStep::Payment.previous(), Some(CheckoutStep::Holder));
    }
}
