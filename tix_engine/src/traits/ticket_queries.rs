use crate::{
    db_types::{BuyerId, EventId, PaymentState, Redemption, Ticket, TicketId},
    traits::{EventSnapshot, StorageError},
};

/// Read-only queries over tickets. None of these mutate state, and none of them may be used to gate a purchase or a
/// redemption.
#[allow(async_fn_in_trait)]
pub trait TicketQueries {
    /// The buyer's tickets, newest first, optionally restricted to one payment state.
    async fn tickets_for_buyer(
        &self,
        buyer_id: &BuyerId,
        payment_state: Option<PaymentState>,
    ) -> Result<Vec<Ticket>, StorageError>;

    async fn tickets_for_event(&self, event_id: &EventId) -> Result<Vec<Ticket>, StorageError>;

    /// The scan audit log for a ticket, in scan order.
    async fn scan_history(&self, ticket_id: &TicketId) -> Result<Vec<Redemption>, StorageError>;

    /// Reads the event, its tiers and per-tier ticket totals in a single read transaction.
    async fn event_snapshot(&self, event_id: &EventId) -> Result<Option<EventSnapshot>, StorageError>;
}
