//! `SqliteDatabase` is the concrete SQLite backend for the ticketing engine.
//!
//! It implements all the traits defined in the [`traits`](crate::traits) module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::Migrator, SqlitePool};

use super::db::{db_url, events, new_pool, profiles, reports, tickets, tiers};
use crate::{
    db_types::{
        BuyerId,
        Event,
        EventId,
        HostId,
        NewEvent,
        NewTicket,
        NewTier,
        PaymentState,
        Profile,
        Redemption,
        Ticket,
        TicketId,
        TicketTier,
        TierId,
    },
    traits::{
        DisplayDirectory,
        EventManagement,
        EventSnapshot,
        RedeemOutcome,
        RescheduleOutcome,
        ReserveOutcome,
        StorageError,
        TicketQueries,
        TicketStore,
        TicketingDatabase,
        TierLedger,
    },
};

static MIGRATOR: Migrator = sqlx::migrate!("./src/sqlite/migrations");

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl TicketingDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}

impl TierLedger for SqliteDatabase {
    async fn reserve(&self, tier_id: &TierId, quantity: i64) -> Result<ReserveOutcome, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::reserve(tier_id, quantity, &mut conn).await
    }

    async fn release(&self, tier_id: &TierId, quantity: i64) -> Result<Option<TicketTier>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::release(tier_id, quantity, &mut conn).await
    }

    async fn fetch_tier(&self, tier_id: &TierId) -> Result<Option<TicketTier>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::fetch_tier(tier_id, &mut conn).await
    }
}

impl TicketStore for SqliteDatabase {
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tickets::insert_ticket(ticket, &mut conn).await
    }

    async fn fetch_ticket(&self, ticket_id: &TicketId) -> Result<Option<Ticket>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tickets::fetch_ticket(ticket_id, &mut conn).await
    }

    async fn redeem(&self, ticket_id: &TicketId, expected_event: &EventId) -> Result<RedeemOutcome, StorageError> {
        let mut tx = self.pool.begin().await?;
        let outcome = tickets::redeem(ticket_id, expected_event, &mut tx).await?;
        if matches!(outcome, RedeemOutcome::Redeemed(_)) {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(outcome)
    }
}

impl EventManagement for SqliteDatabase {
    async fn create_event(&self, event: &NewEvent) -> Result<Event, StorageError> {
        let mut conn = self.pool.acquire().await?;
        events::insert_event(event, &mut conn).await
    }

    async fn add_tier(&self, tier: &NewTier) -> Result<TicketTier, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::insert_tier(tier, &mut conn).await
    }

    async fn create_event_with_tiers(
        &self,
        event: &NewEvent,
        new_tiers: &[NewTier],
    ) -> Result<(Event, Vec<TicketTier>), StorageError> {
        let mut tx = self.pool.begin().await?;
        let event = events::insert_event(event, &mut tx).await?;
        let mut result = Vec::with_capacity(new_tiers.len());
        for tier in new_tiers {
            if tier.event_id != event.id {
                return Err(StorageError::InvalidInput(format!(
                    "Tier {} belongs to event {}, not {}",
                    tier.id, tier.event_id, event.id
                )));
            }
            result.push(tiers::insert_tier(tier, &mut tx).await?);
        }
        tx.commit().await?;
        debug!("🗃️ Event {} stored with {} tiers", event.id, result.len());
        Ok((event, result))
    }

    async fn fetch_event(&self, event_id: &EventId) -> Result<Option<Event>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        events::fetch_event(event_id, &mut conn).await
    }

    async fn tiers_for_event(&self, event_id: &EventId, active_only: bool) -> Result<Vec<TicketTier>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::tiers_for_event(event_id, active_only, &mut conn).await
    }

    async fn set_tier_active(&self, tier_id: &TierId, active: bool) -> Result<Option<TicketTier>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tiers::set_active(tier_id, active, &mut conn).await
    }

    async fn reschedule_event(
        &self,
        event_id: &EventId,
        starts_at: DateTime<Utc>,
    ) -> Result<RescheduleOutcome, StorageError> {
        let mut conn = self.pool.acquire().await?;
        events::reschedule(event_id, starts_at, &mut conn).await
    }

    async fn events_for_host(&self, host_id: &HostId) -> Result<Vec<Event>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        events::events_for_host(host_id, &mut conn).await
    }
}

impl DisplayDirectory for SqliteDatabase {
    async fn event_title(&self, event_id: &EventId) -> Result<Option<String>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        events::event_title(event_id, &mut conn).await
    }

    async fn buyer_name(&self, buyer_id: &BuyerId) -> Result<Option<String>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        profiles::buyer_name(buyer_id, &mut conn).await
    }

    async fn upsert_profile(&self, buyer_id: &BuyerId, display_name: &str) -> Result<Profile, StorageError> {
        let mut conn = self.pool.acquire().await?;
        profiles::upsert_profile(buyer_id, display_name, &mut conn).await
    }
}

impl TicketQueries for SqliteDatabase {
    async fn tickets_for_buyer(
        &self,
        buyer_id: &BuyerId,
        payment_state: Option<PaymentState>,
    ) -> Result<Vec<Ticket>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tickets::tickets_for_buyer(buyer_id, payment_state, &mut conn).await
    }

    async fn tickets_for_event(&self, event_id: &EventId) -> Result<Vec<Ticket>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tickets::tickets_for_event(event_id, &mut conn).await
    }

    async fn scan_history(&self, ticket_id: &TicketId) -> Result<Vec<Redemption>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        tickets::scan_history(ticket_id, &mut conn).await
    }

    async fn event_snapshot(&self, event_id: &EventId) -> Result<Option<EventSnapshot>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let Some(event) = events::fetch_event(event_id, &mut tx).await? else {
            return Ok(None);
        };
        let tiers = tiers::tiers_for_event(event_id, false, &mut tx).await?;
        let totals = reports::tier_totals_for_event(event_id, &mut tx).await?;
        tx.commit().await?;
        Ok(Some(EventSnapshot { event, tiers, totals }))
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `TIX_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. This is safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        MIGRATOR.run(&self.pool).await.map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
