use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
pub use tix_common::{FeeRate, Money};

use crate::helpers::new_id;

//--------------------------------------       Identifiers      ------------------------------------------------------
macro_rules! string_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn random() -> Self {
                Self(new_id($prefix))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(EventId, "evt");
string_id!(TierId, "tier");
string_id!(TicketId, "tkt");
string_id!(BuyerId, "usr");
string_id!(HostId, "host");

//--------------------------------------      PaymentState      ------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    /// Payment has been initiated but not confirmed.
    Pending,
    /// Payment has been settled upstream. Only completed tickets can be redeemed.
    Completed,
    /// Payment was declined or abandoned.
    Failed,
}

impl Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentState::Pending => write!(f, "pending"),
            PaymentState::Completed => write!(f, "completed"),
            PaymentState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment state: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------          Event         ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub host_id: HostId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub id: EventId,
    pub host_id: HostId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

impl NewEvent {
    pub fn new<S: Into<String>>(host_id: HostId, title: S, starts_at: DateTime<Utc>) -> Self {
        Self { id: EventId::random(), host_id, title: title.into(), starts_at }
    }

    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }
}

//--------------------------------------       TicketTier       ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct TicketTier {
    pub id: TierId,
    pub event_id: EventId,
    pub name: String,
    pub price: Money,
    pub capacity: i64,
    pub sold: i64,
    pub active: bool,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketTier {
    pub fn remaining(&self) -> i64 {
        self.capacity - self.sold
    }

    pub fn availability(&self) -> TierAvailability {
        TierAvailability {
            tier_id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            active: self.active,
            capacity: self.capacity,
            sold: self.sold,
            remaining: self.remaining(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTier {
    pub id: TierId,
    pub event_id: EventId,
    pub name: String,
    pub price: Money,
    pub capacity: i64,
    pub display_order: i64,
    pub active: bool,
}

impl NewTier {
    pub fn new<S: Into<String>>(event_id: EventId, name: S, price: Money, capacity: i64) -> Self {
        Self { id: TierId::random(), event_id, name: name.into(), price, capacity, display_order: 0, active: true }
    }

    pub fn with_id(mut self, id: TierId) -> Self {
        self.id = id;
        self
    }

    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A read-committed snapshot of a tier's capacity accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAvailability {
    pub tier_id: TierId,
    pub name: String,
    pub price: Money,
    pub active: bool,
    pub capacity: i64,
    pub sold: i64,
    pub remaining: i64,
}

//--------------------------------------         Ticket         ------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionState {
    /// No admissions have been used.
    Issued,
    /// Some, but not all, admissions have been used.
    PartiallyRedeemed,
    /// Every admission on the ticket has been used.
    FullyRedeemed,
}

/// One purchase transaction. A single ticket may admit several people (`quantity_purchased`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub tier_id: TierId,
    pub event_id: EventId,
    pub buyer_id: BuyerId,
    pub quantity_purchased: i64,
    pub quantity_redeemed: i64,
    pub payment_state: PaymentState,
    pub unit_price: Money,
    pub service_fee: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity_purchased
    }

    pub fn total_paid(&self) -> Money {
        self.subtotal() + self.service_fee
    }

    pub fn remaining(&self) -> i64 {
        self.quantity_purchased - self.quantity_redeemed
    }

    pub fn redemption_state(&self) -> RedemptionState {
        match self.quantity_redeemed {
            0 => RedemptionState::Issued,
            n if n < self.quantity_purchased => RedemptionState::PartiallyRedeemed,
            _ => RedemptionState::FullyRedeemed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub id: TicketId,
    pub tier_id: TierId,
    pub event_id: EventId,
    pub buyer_id: BuyerId,
    pub quantity: i64,
    pub unit_price: Money,
    pub service_fee: Money,
    pub payment_state: PaymentState,
}

impl NewTicket {
    pub fn new(tier: &TicketTier, buyer_id: BuyerId, quantity: i64, service_fee: Money) -> Self {
        Self {
            id: TicketId::random(),
            tier_id: tier.id.clone(),
            event_id: tier.event_id.clone(),
            buyer_id,
            quantity,
            unit_price: tier.price,
            service_fee,
            payment_state: PaymentState::Completed,
        }
    }

    pub fn with_payment_state(mut self, state: PaymentState) -> Self {
        self.payment_state = state;
        self
    }
}

//--------------------------------------       Redemption       ------------------------------------------------------
/// An entry in the scan audit log. One row is written for every admission consumed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Redemption {
    pub id: i64,
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub scan_number: i64,
    pub redeemed_at: DateTime<Utc>,
}

//--------------------------------------         Profile        ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub buyer_id: BuyerId,
    pub display_name: String,
}
