use thiserror::Error;

use crate::{
    db_types::{EventId, TicketId, TierId},
    traits::StorageError,
};

#[derive(Debug, Clone, Error)]
pub enum PurchaseError {
    #[error("At least one ticket must be purchased, but {0} were requested")]
    InvalidQuantity(i64),
    #[error("Ticket tier {0} does not exist")]
    TierNotFound(TierId),
    #[error("Ticket tier {0} is not on sale")]
    TierInactive(TierId),
    #[error("No tickets left on tier {tier_id}. {requested} requested but only {remaining} remain")]
    SoldOut { tier_id: TierId, requested: i64, remaining: i64 },
    #[error("The order total is too large to represent")]
    PriceOverflow,
    #[error("The purchase could not be completed. Please try again. {0}")]
    StorageFailure(#[from] StorageError),
}

/// Rejected scans are not errors; they are reported through `ScanResult`. This only covers storage faults.
#[derive(Debug, Clone, Error)]
pub enum CheckInError {
    #[error("The scan could not be processed. Please try again. {0}")]
    StorageFailure(#[from] StorageError),
}

#[derive(Debug, Clone, Error)]
pub enum EventSetupError {
    #[error("Invalid event configuration. {0}")]
    InvalidInput(String),
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("Ticket tier {0} does not exist")]
    TierNotFound(TierId),
    #[error("Event {0} already has tickets issued against it and can no longer be changed")]
    EventLocked(EventId),
    #[error("Storage failure. {0}")]
    StorageFailure(#[from] StorageError),
}

#[derive(Debug, Clone, Error)]
pub enum AvailabilityError {
    #[error("Ticket tier {0} does not exist")]
    TierNotFound(TierId),
    #[error("Event {0} does not exist")]
    EventNotFound(EventId),
    #[error("Ticket {0} does not exist")]
    TicketNotFound(TicketId),
    #[error("Storage failure. {0}")]
    StorageFailure(#[from] StorageError),
}
