#![allow(dead_code)]
use std::time::Duration;

use chrono::Utc;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use tix_engine::{
    db_types::{BuyerId, HostId, Money, NewTicket, PaymentState, Ticket, TicketTier},
    events::EventProducers,
    helpers::{RetryPolicy, TokenCodec},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    tix_api::setup_objects::{EventDraft, EventWithTiers, TierDraft},
    traits::ReserveOutcome,
    AvailabilityApi,
    CheckInApi,
    EventSetupApi,
    PurchaseApi,
    SqliteDatabase,
    TicketStore,
    TicketingDatabase,
    TierLedger,
};

pub const MAX_CONNECTIONS: u32 = 10;

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(5, Duration::from_millis(5))
}

pub struct TestSystem {
    pub url: String,
    pub db: SqliteDatabase,
}

impl TestSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, MAX_CONNECTIONS).await.expect("Error creating database");
        Self { url, db }
    }

    pub fn purchase_api(&self) -> PurchaseApi<SqliteDatabase> {
        PurchaseApi::new(self.db.clone(), Default::default(), fast_retry(), EventProducers::default())
    }

    pub fn check_in_api(&self) -> CheckInApi<SqliteDatabase> {
        CheckInApi::new(self.db.clone(), TokenCodec::unsigned(), fast_retry(), EventProducers::default())
    }

    pub fn availability_api(&self) -> AvailabilityApi<SqliteDatabase> {
        AvailabilityApi::new(self.db.clone(), TokenCodec::unsigned())
    }

    pub fn setup_api(&self) -> EventSetupApi<SqliteDatabase> {
        EventSetupApi::new(self.db.clone())
    }

    /// Creates an event starting tomorrow with one tier per `(name, price, capacity)` entry.
    pub async fn create_event(&self, title: &str, tiers: &[(&str, i64, i64)]) -> EventWithTiers {
        let mut draft = EventDraft::new(HostId::from("host_test"), title, Utc::now() + chrono::Duration::days(1));
        for (name, price, capacity) in tiers {
            draft = draft.with_tier(TierDraft::new(*name, Money::from(*price), *capacity));
        }
        self.setup_api().create_event(draft).await.expect("Error creating event")
    }

    /// Issues a ticket straight through the backend, bypassing the purchase workflow. Used to create tickets whose
    /// payment has not completed.
    pub async fn issue_ticket(
        &self,
        tier: &TicketTier,
        buyer: &str,
        quantity: i64,
        payment_state: PaymentState,
    ) -> Ticket {
        match self.db.reserve(&tier.id, quantity).await.expect("Error reserving capacity") {
            ReserveOutcome::Reserved(tier) => {
                let ticket = NewTicket::new(&tier, BuyerId::from(buyer), quantity, Money::from(0))
                    .with_payment_state(payment_state);
                self.db.create_ticket(&ticket).await.expect("Error creating ticket")
            },
            other => panic!("Could not reserve {quantity} on tier {}: {other:?}", tier.id),
        }
    }

    pub async fn tear_down(mut self) {
        if let Err(e) = self.db.close().await {
            error!("🚀️ Failed to close database: {e}");
        }
        if let Err(e) = Sqlite::drop_database(&self.url).await {
            warn!("🚀️ Failed to remove test database {}: {e}", self.url);
        }
    }
}
