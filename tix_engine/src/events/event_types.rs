use serde::{Deserialize, Serialize};

use crate::db_types::Ticket;

/// Published once a purchase has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPurchasedEvent {
    pub ticket: Ticket,
}

impl TicketPurchasedEvent {
    pub fn new(ticket: Ticket) -> Self {
        Self { ticket }
    }
}

/// Published for every admission consumed at the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRedeemedEvent {
    pub ticket: Ticket,
    pub scan_number: i64,
}

impl TicketRedeemedEvent {
    pub fn new(ticket: Ticket, scan_number: i64) -> Self {
        Self { ticket, scan_number }
    }
}
