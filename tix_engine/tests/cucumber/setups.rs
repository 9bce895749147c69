use chrono::{Duration, Utc};
use cucumber::given;
use tix_engine::{
    db_types::{BuyerId, HostId, Money},
    tix_api::setup_objects::{EventDraft, TierDraft},
};

use crate::cucumber::{TicketSystem, TicketWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut TicketWorld) {
    let system = TicketSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "an event {string} with a tier {string} priced at {int} with capacity {int}")]
async fn event_with_tier(world: &mut TicketWorld, title: String, tier: String, price: i64, capacity: i64) {
    let draft = EventDraft::new(HostId::from("host_cucumber"), title.as_str(), Utc::now() + Duration::days(1))
        .with_tier(TierDraft::new(tier, Money::from(price), capacity));
    let event = world.system().setup.create_event(draft).await.expect("Error creating event");
    world.events.insert(title, event);
}

#[given(expr = "{string} has bought {int} ticket(s) on tier {string} of {string}")]
async fn has_bought(world: &mut TicketWorld, buyer: String, quantity: i64, tier: String, event: String) {
    let tier_id = world.tier(&event, &tier).id.clone();
    let ticket = world
        .system()
        .purchase
        .purchase(&tier_id, &BuyerId::from(buyer.as_str()), quantity)
        .await
        .expect("Error buying tickets");
    world.tickets.insert(buyer, ticket);
}
