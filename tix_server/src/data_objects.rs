use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tix_engine::db_types::{BuyerId, Money, Ticket};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub buyer_id: BuyerId,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

/// A freshly issued ticket, with the amount charged and the code to present at the door.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub ticket: Ticket,
    pub total: Money,
    pub token: String,
}

impl PurchaseResponse {
    pub fn new(ticket: Ticket, token: String) -> Self {
        let total = ticket.total_paid();
        Self { ticket, total, token }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub display_name: String,
}
