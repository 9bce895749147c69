use std::{collections::HashMap, fmt::Debug};

use chrono::Utc;
use log::*;

use crate::{
    db_types::{BuyerId, Event, EventId, HostId, PaymentState, Redemption, TicketId, TierAvailability, TierId},
    helpers::TokenCodec,
    tix_api::{
        errors::AvailabilityError,
        report_objects::{BuyerTicket, EventSummary, HostSummary},
    },
    traits::{EventManagement, TicketQueries, TicketStore, TierLedger},
};

/// Read-only views over tiers and tickets.
///
/// Nothing here is fit to gate a purchase or a redemption. Those re-check inline against the store.
pub struct AvailabilityApi<B> {
    db: B,
    codec: TokenCodec,
}

impl<B> Debug for AvailabilityApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AvailabilityApi")
    }
}

impl<B> AvailabilityApi<B> {
    pub fn new(db: B, codec: TokenCodec) -> Self {
        Self { db, codec }
    }
}

impl<B> AvailabilityApi<B>
where B: TierLedger + TicketStore + EventManagement + TicketQueries
{
    pub async fn tier_availability(&self, tier_id: &TierId) -> Result<TierAvailability, AvailabilityError> {
        self.db.availability(tier_id).await?.ok_or_else(|| AvailabilityError::TierNotFound(tier_id.clone()))
    }

    /// Capacity, sales, redemptions and revenue for every tier of the event, inactive tiers included.
    pub async fn event_summary(&self, event_id: &EventId) -> Result<EventSummary, AvailabilityError> {
        let snapshot =
            self.db.event_snapshot(event_id).await?.ok_or_else(|| AvailabilityError::EventNotFound(event_id.clone()))?;
        Ok(EventSummary::from(snapshot))
    }

    /// The host dashboard: totals across all of the host's events.
    pub async fn host_summary(&self, host_id: &HostId) -> Result<HostSummary, AvailabilityError> {
        let events = self.db.events_for_host(host_id).await?;
        let mut summaries = Vec::with_capacity(events.len());
        for event in events {
            match self.db.event_snapshot(&event.id).await? {
                Some(snapshot) => summaries.push(EventSummary::from(snapshot)),
                None => warn!("🗃️ Event {} disappeared while building the summary for host {host_id}", event.id),
            }
        }
        Ok(HostSummary::new(host_id.clone(), summaries, Utc::now()))
    }

    /// The buyer's completed tickets, newest first, each with the token to present at the door.
    pub async fn tickets_for_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<BuyerTicket>, AvailabilityError> {
        let tickets = self.db.tickets_for_buyer(buyer_id, Some(PaymentState::Completed)).await?;
        let mut events: HashMap<EventId, Option<Event>> = HashMap::new();
        let mut result = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            if !events.contains_key(&ticket.event_id) {
                let event = self.db.fetch_event(&ticket.event_id).await?;
                events.insert(ticket.event_id.clone(), event);
            }
            let event = events.get(&ticket.event_id).and_then(|e| e.as_ref());
            let event_title = event.map(|e| e.title.clone()).unwrap_or_else(|| ticket.event_id.to_string());
            let starts_at = event.map(|e| e.starts_at);
            let token = self.codec.encode(&ticket.id, &ticket.event_id, &ticket.buyer_id);
            let redemption_state = ticket.redemption_state();
            result.push(BuyerTicket { ticket, event_title, starts_at, token, redemption_state });
        }
        Ok(result)
    }

    pub async fn scan_history(&self, ticket_id: &TicketId) -> Result<Vec<Redemption>, AvailabilityError> {
        if self.db.fetch_ticket(ticket_id).await?.is_none() {
            return Err(AvailabilityError::TicketNotFound(ticket_id.clone()));
        }
        Ok(self.db.scan_history(ticket_id).await?)
    }
}
