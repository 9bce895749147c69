use std::collections::HashMap;

use cucumber::World;
use log::*;
use tix_engine::{
    db_types::{Ticket, TicketTier},
    events::EventProducers,
    helpers::{RetryPolicy, TokenCodec},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    tix_api::{scan_objects::ScanResult, setup_objects::EventWithTiers},
    AvailabilityApi,
    CheckInApi,
    EventSetupApi,
    PurchaseApi,
    PurchaseError,
    SqliteDatabase,
};

#[derive(Default, Debug, World)]
pub struct TicketWorld {
    pub system: Option<TicketSystem>,
    /// Events by title
    pub events: HashMap<String, EventWithTiers>,
    /// The most recent ticket bought by each buyer
    pub tickets: HashMap<String, Ticket>,
    pub last_purchase: Option<Result<Ticket, PurchaseError>>,
    pub scans: Vec<ScanResult>,
}

#[derive(Debug)]
pub struct TicketSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub purchase: PurchaseApi<SqliteDatabase>,
    pub check_in: CheckInApi<SqliteDatabase>,
    pub availability: AvailabilityApi<SqliteDatabase>,
    pub setup: EventSetupApi<SqliteDatabase>,
}

impl TicketWorld {
    pub fn system(&self) -> &TicketSystem {
        self.system.as_ref().expect("Ticket system not initialised")
    }

    pub fn event(&self, title: &str) -> &EventWithTiers {
        self.events.get(title).unwrap_or_else(|| panic!("No event called {title}"))
    }

    pub fn tier(&self, event: &str, tier: &str) -> &TicketTier {
        let event = self.event(event);
        event.tiers.iter().find(|t| t.name == tier).unwrap_or_else(|| panic!("No tier {tier} on {}", event.event.title))
    }

    pub fn ticket(&self, buyer: &str) -> &Ticket {
        self.tickets.get(buyer).unwrap_or_else(|| panic!("{buyer} has no ticket"))
    }
}

impl TicketSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 10).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let retry = RetryPolicy::new(5, std::time::Duration::from_millis(5));
        let codec = TokenCodec::unsigned();
        Self {
            db_path: url,
            purchase: PurchaseApi::new(db.clone(), Default::default(), retry, EventProducers::default()),
            check_in: CheckInApi::new(db.clone(), codec.clone(), retry, EventProducers::default()),
            availability: AvailabilityApi::new(db.clone(), codec),
            setup: EventSetupApi::new(db.clone()),
            db,
        }
    }
}
