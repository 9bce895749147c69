use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tix_common::Money;

use crate::{
    db_types::{Event, EventId, HostId, RedemptionState, Ticket, TierId},
    traits::EventSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSummary {
    pub tier_id: TierId,
    pub name: String,
    pub price: Money,
    pub active: bool,
    pub capacity: i64,
    pub sold: i64,
    pub remaining: i64,
    /// Number of completed ticket records on this tier.
    pub tickets: i64,
    pub redeemed: i64,
    pub revenue: Money,
    pub fees: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: EventId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub total_capacity: i64,
    pub total_sold: i64,
    pub total_redeemed: i64,
    /// `sum(unit_price * quantity_purchased)` over completed tickets. Service fees are reported separately.
    pub revenue: Money,
    pub fees: Money,
    pub tiers: Vec<TierSummary>,
}

impl From<EventSnapshot> for EventSummary {
    fn from(snapshot: EventSnapshot) -> Self {
        let tiers = snapshot
            .tiers
            .iter()
            .map(|tier| {
                let totals = snapshot.totals_for(&tier.id);
                TierSummary {
                    tier_id: tier.id.clone(),
                    name: tier.name.clone(),
                    price: tier.price,
                    active: tier.active,
                    capacity: tier.capacity,
                    sold: tier.sold,
                    remaining: tier.remaining(),
                    tickets: totals.map(|t| t.tickets).unwrap_or_default(),
                    redeemed: totals.map(|t| t.redeemed).unwrap_or_default(),
                    revenue: totals.map(|t| t.revenue).unwrap_or_default(),
                    fees: totals.map(|t| t.fees).unwrap_or_default(),
                }
            })
            .collect::<Vec<_>>();
        let Event { id, title, starts_at, .. } = snapshot.event;
        EventSummary {
            event_id: id,
            title,
            starts_at,
            total_capacity: tiers.iter().map(|t| t.capacity).sum(),
            total_sold: tiers.iter().map(|t| t.sold).sum(),
            total_redeemed: tiers.iter().map(|t| t.redeemed).sum(),
            revenue: tiers.iter().map(|t| t.revenue).sum(),
            fees: tiers.iter().map(|t| t.fees).sum(),
            tiers,
        }
    }
}

impl EventSummary {
    /// Events starting exactly at `now` still count as upcoming.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.starts_at >= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    pub host_id: HostId,
    pub event_count: usize,
    /// Events starting at or after the time the summary was taken.
    pub upcoming_events: usize,
    pub total_capacity: i64,
    pub total_sold: i64,
    pub total_redeemed: i64,
    pub revenue: Money,
    pub events: Vec<EventSummary>,
}

impl HostSummary {
    pub fn new(host_id: HostId, events: Vec<EventSummary>, now: DateTime<Utc>) -> Self {
        Self {
            host_id,
            event_count: events.len(),
            upcoming_events: events.iter().filter(|e| e.is_upcoming(now)).count(),
            total_capacity: events.iter().map(|e| e.total_capacity).sum(),
            total_sold: events.iter().map(|e| e.total_sold).sum(),
            total_redeemed: events.iter().map(|e| e.total_redeemed).sum(),
            revenue: events.iter().map(|e| e.revenue).sum(),
            events,
        }
    }
}

/// A ticket as shown in the buyer's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerTicket {
    pub ticket: Ticket,
    pub event_title: String,
    pub starts_at: Option<DateTime<Utc>>,
    /// The code to present at the door.
    pub token: String,
    pub redemption_state: RedemptionState,
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;
    use crate::{
        db_types::{TicketTier, TierId},
        traits::TierTicketTotals,
    };

    fn tier(id: &str, capacity: i64, sold: i64, active: bool) -> TicketTier {
        TicketTier {
            id: TierId::from(id),
            event_id: EventId::from("evt_1"),
            name: id.to_uppercase(),
            price: Money::from(1_000),
            capacity,
            sold,
            active,
            display_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn snapshot() -> EventSnapshot {
        let now = Utc::now();
        EventSnapshot {
            event: Event {
                id: EventId::from("evt_1"),
                host_id: HostId::from("host_1"),
                title: "Rooftop".into(),
                starts_at: now + Duration::days(3),
                created_at: now,
            },
            tiers: vec![tier("ga", 100, 10, true), tier("vip", 10, 2, false)],
            totals: vec![TierTicketTotals {
                tier_id: TierId::from("ga"),
                tickets: 4,
                redeemed: 3,
                revenue: Money::from(10_000),
                fees: Money::from(700),
            }],
        }
    }

    #[test]
    fn event_summary_includes_inactive_tiers() {
        let summary = EventSummary::from(snapshot());
        assert_eq!(summary.total_capacity, 110);
        assert_eq!(summary.total_sold, 12);
        assert_eq!(summary.total_redeemed, 3);
        assert_eq!(summary.revenue, Money::from(10_000));
        assert_eq!(summary.tiers[1].remaining, 8);
        assert_eq!(summary.tiers[1].tickets, 0);
    }

    #[test]
    fn host_summary_counts_upcoming_events() {
        let upcoming = EventSummary::from(snapshot());
        let mut past = upcoming.clone();
        past.starts_at = Utc::now() - Duration::days(30);
        let summary = HostSummary::new(HostId::from("host_1"), vec![upcoming, past], Utc::now());
        assert_eq!(summary.event_count, 2);
        assert_eq!(summary.upcoming_events, 1);
        assert_eq!(summary.total_capacity, 220);
        assert_eq!(summary.revenue, Money::from(20_000));
    }
}
