use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tix_common::{FeeRate, Money};

use crate::tix_api::errors::PurchaseError;

/// The price breakdown for buying `quantity` tickets on one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
    pub service_fee: Money,
    pub total: Money,
}

impl PriceQuote {
    /// `subtotal = unit_price * quantity`, `fee = subtotal * rate` (rounded half up), `total = subtotal + fee`.
    pub fn calculate(unit_price: Money, quantity: i64, rate: FeeRate) -> Result<Self, PurchaseError> {
        if quantity <= 0 {
            return Err(PurchaseError::InvalidQuantity(quantity));
        }
        let subtotal = unit_price.checked_mul(quantity).ok_or(PurchaseError::PriceOverflow)?;
        let service_fee = rate.fee_on(subtotal).ok_or(PurchaseError::PriceOverflow)?;
        let total =
            subtotal.value().checked_add(service_fee.value()).map(Money::from).ok_or(PurchaseError::PriceOverflow)?;
        Ok(Self { unit_price, quantity, subtotal, service_fee, total })
    }
}

/// Where a single purchase attempt has got to.
///
/// `Requested -> CapacityReserved -> TicketCreated -> Committed` is the happy path. A failed reservation ends in
/// `Rejected`; a failure after the reservation ends in `CapacityReleased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStage {
    Requested,
    CapacityReserved,
    TicketCreated,
    Committed,
    CapacityReleased,
    Rejected,
}

impl Display for PurchaseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Requested => "Requested",
            Self::CapacityReserved => "CapacityReserved",
            Self::TicketCreated => "TicketCreated",
            Self::Committed => "Committed",
            Self::CapacityReleased => "CapacityReleased",
            Self::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}
