use crate::{
    db_types::{EventId, NewTicket, Ticket, TicketId},
    traits::{RedeemOutcome, StorageError},
};

/// Durable record of issued tickets and their redemption state.
///
/// Tickets are never deleted.
#[allow(async_fn_in_trait)]
pub trait TicketStore {
    /// Inserts a new ticket with `quantity_redeemed = 0`.
    ///
    /// Only call this once capacity for the same quantity has been reserved on the ticket's tier. If this call fails,
    /// the caller is responsible for releasing that capacity again.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, StorageError>;

    async fn fetch_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, StorageError>;

    /// Consumes exactly one admission from the ticket, if
    /// * the ticket belongs to `expected_event`,
    /// * its payment has completed, and
    /// * it still has admissions left.
    ///
    /// The check and the increment are a single conditional update, and the scan audit entry is written in the same
    /// transaction. Concurrent callers for a ticket with `k` admissions left see at most `k` successes between them.
    async fn redeem(&self, ticket_id: &TicketId, expected_event: &EventId) -> Result<RedeemOutcome, StorageError>;
}
