use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{BuyerId, Event, EventId, NewEvent, NewTier, Profile, TicketTier, TierId},
    tix_api::{
        errors::EventSetupError,
        setup_objects::{EventDraft, EventWithTiers, TierDraft},
    },
    traits::{DisplayDirectory, EventManagement, RescheduleOutcome},
};

/// Event configuration for hosts, and profile maintenance for buyers.
pub struct EventSetupApi<B> {
    db: B,
}

impl<B> Debug for EventSetupApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventSetupApi")
    }
}

impl<B> EventSetupApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> EventSetupApi<B>
where B: EventManagement + DisplayDirectory
{
    /// Creates the event and its tiers atomically. Tiers are displayed in the order given.
    pub async fn create_event(&self, draft: EventDraft) -> Result<EventWithTiers, EventSetupError> {
        draft.validate().map_err(EventSetupError::InvalidInput)?;
        let new_event = NewEvent::new(draft.host_id, draft.title.trim(), draft.starts_at);
        let tiers = draft
            .tiers
            .into_iter()
            .zip(0i64..)
            .map(|(tier, order)| new_tier(&new_event.id, tier, order))
            .collect::<Vec<_>>();
        let (event, tiers) = self.db.create_event_with_tiers(&new_event, &tiers).await?;
        info!("🎟️ Event '{}' [{}] created with {} tiers", event.title, event.id, tiers.len());
        Ok(EventWithTiers { event, tiers })
    }

    /// Adds a tier after the event's existing ones.
    pub async fn add_tier(&self, event_id: &EventId, draft: TierDraft) -> Result<TicketTier, EventSetupError> {
        draft.validate().map_err(EventSetupError::InvalidInput)?;
        if self.db.fetch_event(event_id).await?.is_none() {
            return Err(EventSetupError::EventNotFound(event_id.clone()));
        }
        let existing = self.db.tiers_for_event(event_id, false).await?;
        let order = existing.iter().map(|t| t.display_order + 1).max().unwrap_or_default();
        let tier = self.db.add_tier(&new_tier(event_id, draft, order)).await?;
        info!("🎟️ Tier '{}' [{}] added to event {event_id}", tier.name, tier.id);
        Ok(tier)
    }

    /// Puts a tier on sale or takes it off sale. Tickets already sold are unaffected.
    pub async fn set_tier_active(&self, tier_id: &TierId, active: bool) -> Result<TicketTier, EventSetupError> {
        let tier =
            self.db.set_tier_active(tier_id, active).await?.ok_or_else(|| EventSetupError::TierNotFound(tier_id.clone()))?;
        info!("🎟️ Tier {tier_id} is {} sale", if tier.active { "on" } else { "off" });
        Ok(tier)
    }

    pub async fn reschedule(&self, event_id: &EventId, starts_at: DateTime<Utc>) -> Result<Event, EventSetupError> {
        match self.db.reschedule_event(event_id, starts_at).await? {
            RescheduleOutcome::Rescheduled(event) => {
                info!("🎟️ Event {event_id} now starts at {starts_at}");
                Ok(event)
            },
            RescheduleOutcome::Locked => {
                debug!("🎟️ Event {event_id} cannot be rescheduled because tickets have been issued");
                Err(EventSetupError::EventLocked(event_id.clone()))
            },
            RescheduleOutcome::NotFound => Err(EventSetupError::EventNotFound(event_id.clone())),
        }
    }

    pub async fn event_with_tiers(
        &self,
        event_id: &EventId,
        active_only: bool,
    ) -> Result<EventWithTiers, EventSetupError> {
        let event =
            self.db.fetch_event(event_id).await?.ok_or_else(|| EventSetupError::EventNotFound(event_id.clone()))?;
        let tiers = self.db.tiers_for_event(event_id, active_only).await?;
        Ok(EventWithTiers { event, tiers })
    }

    pub async fn upsert_profile(&self, buyer_id: &BuyerId, display_name: &str) -> Result<Profile, EventSetupError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(EventSetupError::InvalidInput("The display name cannot be empty".into()));
        }
        Ok(self.db.upsert_profile(buyer_id, name).await?)
    }
}

fn new_tier(event_id: &EventId, draft: TierDraft, order: i64) -> NewTier {
    let tier = NewTier::new(event_id.clone(), draft.name.trim(), draft.price, draft.capacity).with_display_order(order);
    if draft.active {
        tier
    } else {
        tier.inactive()
    }
}
