//! Ticket purchase and the user's tickets.

use uuid::Uuid;

use super::EVENT_SUMMARY;
use crate::checkout::PurchaseRequest;
use crate::error::Result;
use crate::models::Ticket;
use crate::Backend;

/// Buy tickets through the `purchase_tickets` RPC, which prices and issues them.
pub async fn purchase(backend: &Backend, request: &PurchaseRequest) -> Result<Vec<Ticket>> {
    let tickets: Vec<Ticket> = backend.rpc("purchase_tickets", request).await?;
    tracing::info!(
        event = %request.p_event_id,
        count = tickets.len(),
        "purchased tickets"
    );
    Ok(tickets)
}

pub async fn mine(backend: &Backend, me: Uuid) -> Result<Vec<Ticket>> {
    backend
        .from("tickets")
        .select(&format!("*,event:events({EVENT_SUMMARY})"))
        .eq("user_id", me)
        .order("created_at", false)
        .execute()
        .await
}

pub async fn get(backend: &Backend, id: Uuid) -> Result<Ticket> {
    backend
        .from("tickets")
        .select(&format!("*,event:events({EVENT_SUMMARY})"))
        .eq("id", id)
        .single()
        .await
}
