use serde::{Deserialize, Serialize};

use crate::db_types::{Event, EventId, Money, PaymentState, Ticket, TicketTier, TierId};

/// The result of trying to claim capacity against a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// Capacity was claimed. The tier is returned in its post-increment state.
    Reserved(TicketTier),
    CapacityExceeded { requested: i64, remaining: i64 },
    TierInactive,
    TierNotFound,
}

/// A successful redemption step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeemed {
    /// The ticket in its post-increment state.
    pub ticket: Ticket,
    /// Equal to the new `quantity_redeemed`.
    pub scan_number: i64,
    pub remaining: i64,
}

/// The result of trying to consume one admission from a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    Redeemed(Redeemed),
    WrongEvent { ticket_event: EventId },
    PaymentIncomplete(PaymentState),
    FullyRedeemed { quantity_purchased: i64 },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleOutcome {
    Rescheduled(Event),
    /// Tickets have already been issued against the event, so its schedule is frozen.
    Locked,
    NotFound,
}

/// Ticket aggregates for a single tier. Only completed tickets are counted.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TierTicketTotals {
    pub tier_id: TierId,
    pub tickets: i64,
    pub redeemed: i64,
    pub revenue: Money,
    pub fees: Money,
}

/// An event, its tiers, and the ticket totals for each tier, all read from the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSnapshot {
    pub event: Event,
    pub tiers: Vec<TicketTier>,
    pub totals: Vec<TierTicketTotals>,
}

impl EventSnapshot {
    pub fn totals_for(&self, tier_id: &TierId) -> Option<&TierTicketTotals> {
        self.totals.iter().find(|t| &t.tier_id == tier_id)
    }
}
