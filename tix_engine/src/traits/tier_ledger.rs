use crate::{
    db_types::{TicketTier, TierAvailability, TierId},
    traits::{ReserveOutcome, StorageError},
};

/// Authoritative capacity accounting per tier.
///
/// `sold <= capacity` must hold at all times, and it must be enforced by the store itself in the same statement that
/// changes `sold`. Two concurrent reservations for the last remaining unit can never both succeed.
#[allow(async_fn_in_trait)]
pub trait TierLedger {
    /// Atomically checks `sold + quantity <= capacity` and, if it holds, increments `sold` by `quantity`.
    ///
    /// A successful reservation is durable and visible to subsequent reads as soon as this call returns.
    /// `quantity` must be positive.
    async fn reserve(&self, tier_id: &TierId, quantity: i64) -> Result<ReserveOutcome, StorageError>;

    /// Gives back `quantity` units previously claimed with [`reserve`](TierLedger::reserve). This is only used to
    /// compensate a purchase whose ticket could not be created. `sold` never drops below zero.
    ///
    /// Returns the updated tier, or `None` if nothing could be released.
    async fn release(&self, tier_id: &TierId, quantity: i64) -> Result<Option<TicketTier>, StorageError>;

    async fn fetch_tier(&self, tier_id: &TierId) -> Result<Option<TicketTier>, StorageError>;

    /// A read-committed snapshot of the tier's capacity. Never use it to gate a purchase decision.
    async fn availability(&self, tier_id: &TierId) -> Result<Option<TierAvailability>, StorageError> {
        Ok(self.fetch_tier(tier_id).await?.map(|t| t.availability()))
    }
}
