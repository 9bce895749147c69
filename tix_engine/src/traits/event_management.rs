use chrono::{DateTime, Utc};

use crate::{
    db_types::{Event, EventId, HostId, NewEvent, NewTier, TicketTier, TierId},
    traits::{RescheduleOutcome, StorageError},
};

/// Event and tier configuration, as performed by a host.
#[allow(async_fn_in_trait)]
pub trait EventManagement {
    async fn create_event(&self, event: &NewEvent) -> Result<Event, StorageError>;

    async fn add_tier(&self, tier: &NewTier) -> Result<TicketTier, StorageError>;

    /// Creates the event and all of its tiers in one transaction. Either everything is stored, or nothing is.
    async fn create_event_with_tiers(
        &self,
        event: &NewEvent,
        tiers: &[NewTier],
    ) -> Result<(Event, Vec<TicketTier>), StorageError>;

    async fn fetch_event(&self, event_id: &EventId) -> Result<Option<Event>, StorageError>;

    /// The event's tiers in display order. Buyers only get to see active tiers.
    async fn tiers_for_event(&self, event_id: &EventId, active_only: bool) -> Result<Vec<TicketTier>, StorageError>;

    async fn set_tier_active(&self, tier_id: &TierId, active: bool) -> Result<Option<TicketTier>, StorageError>;

    /// Moves the event's start time. Events are immutable once any ticket exists against them, so this is a
    /// conditional update that returns [`RescheduleOutcome::Locked`] in that case.
    async fn reschedule_event(
        &self,
        event_id: &EventId,
        starts_at: DateTime<Utc>,
    ) -> Result<RescheduleOutcome, StorageError>;

    /// All events owned by the host, soonest first.
    async fn events_for_host(&self, host_id: &HostId) -> Result<Vec<Event>, StorageError>;
}
