use std::collections::BTreeSet;

use cucumber::{then, when};
use futures_util::future::join_all;
use tix_engine::{
    db_types::{BuyerId, Money, TicketId},
    tix_api::scan_objects::{ScanRejection, ScanResult},
    PurchaseError,
    TicketStore,
    TierLedger,
};

use crate::cucumber::TicketWorld;

#[when(expr = "{string} buys {int} ticket(s) on tier {string} of {string}")]
async fn buy(world: &mut TicketWorld, buyer: String, quantity: i64, tier: String, event: String) {
    let tier_id = world.tier(&event, &tier).id.clone();
    let result = world.system().purchase.purchase(&tier_id, &BuyerId::from(buyer.as_str()), quantity).await;
    if let Ok(ticket) = &result {
        world.tickets.insert(buyer, ticket.clone());
    }
    world.last_purchase = Some(result);
}

#[then(expr = "the purchase succeeds with a total of {int}")]
async fn purchase_succeeds(world: &mut TicketWorld, total: i64) {
    match world.last_purchase.as_ref().expect("No purchase was made") {
        Ok(ticket) => assert_eq!(ticket.total_paid(), Money::from(total)),
        Err(e) => panic!("Purchase failed: {e}"),
    }
}

#[then("the purchase fails because the tier is sold out")]
async fn purchase_sold_out(world: &mut TicketWorld) {
    let result = world.last_purchase.as_ref().expect("No purchase was made");
    assert!(matches!(result, Err(PurchaseError::SoldOut { .. })), "{result:?}");
}

#[then(expr = "tier {string} of {string} has {int} sold and {int} remaining")]
async fn tier_counts(world: &mut TicketWorld, tier: String, event: String, sold: i64, remaining: i64) {
    let tier_id = world.tier(&event, &tier).id.clone();
    let availability = world.system().db.availability(&tier_id).await.expect("Error reading tier").expect("No tier");
    assert_eq!(availability.sold, sold);
    assert_eq!(availability.remaining, remaining);
}

#[when(expr = "the ticket of {string} is scanned at {string}")]
async fn scan_ticket(world: &mut TicketWorld, buyer: String, event: String) {
    let ticket_id = world.ticket(&buyer).id.clone();
    let event_id = world.event(&event).event.id.clone();
    let system = world.system();
    let token = system.check_in.token_for(&ticket_id).await.expect("Error fetching token").expect("No ticket");
    let result = system.check_in.check_in(&token, &event_id).await.expect("Scan failed");
    world.scans = vec![result];
}

#[when(expr = "the code {string} is scanned at {string}")]
async fn scan_code(world: &mut TicketWorld, code: String, event: String) {
    let event_id = world.event(&event).event.id.clone();
    let result = world.system().check_in.check_in(&code, &event_id).await.expect("Scan failed");
    world.scans = vec![result];
}

#[when(expr = "a ticket that was never sold is scanned at {string}")]
async fn scan_unknown(world: &mut TicketWorld, event: String) {
    let event_id = world.event(&event).event.id.clone();
    let system = world.system();
    let token = system.check_in.codec().encode(&TicketId::random(), &event_id, &BuyerId::from("usr_ghost"));
    let result = system.check_in.check_in(&token, &event_id).await.expect("Scan failed");
    world.scans = vec![result];
}

#[when(expr = "the ticket of {string} is scanned at {string} by {int} scanners at once")]
async fn scan_concurrently(world: &mut TicketWorld, buyer: String, event: String, scanners: usize) {
    let ticket_id = world.ticket(&buyer).id.clone();
    let event_id = world.event(&event).event.id.clone();
    let system = world.system();
    let token = system.check_in.token_for(&ticket_id).await.expect("Error fetching token").expect("No ticket");
    let results = join_all((0..scanners).map(|_| system.check_in.check_in(&token, &event_id))).await;
    world.scans = results.into_iter().map(|r| r.expect("Scan failed")).collect();
}

#[then(expr = "the guest is admitted with scan number {int} and {int} remaining")]
async fn admitted(world: &mut TicketWorld, scan_number: i64, remaining: i64) {
    match world.scans.last().expect("Nothing was scanned") {
        ScanResult::Admitted(a) => {
            assert_eq!(a.scan_number, scan_number);
            assert_eq!(a.remaining, remaining);
        },
        ScanResult::Rejected(r) => panic!("Guest was turned away: {r}"),
    }
}

#[then(expr = "the scan is rejected with {string}")]
async fn rejected_with(world: &mut TicketWorld, message: String) {
    let result = world.scans.last().expect("Nothing was scanned");
    assert!(!result.is_admitted(), "{result:?}");
    assert_eq!(result.message(), message);
}

#[then(expr = "the scan is rejected because the ticket is for {string} not {string}")]
async fn rejected_wrong_event(world: &mut TicketWorld, ticket_event: String, scanning_event: String) {
    let result = world.scans.last().expect("Nothing was scanned");
    assert_eq!(result, &ScanResult::Rejected(ScanRejection::WrongEvent { ticket_event, scanning_event }));
}

#[then(expr = "the ticket of {string} has {int} redemption(s)")]
async fn redemptions(world: &mut TicketWorld, buyer: String, count: i64) {
    let ticket_id = world.ticket(&buyer).id.clone();
    let ticket = world.system().db.fetch_ticket(&ticket_id).await.expect("Error reading ticket").expect("No ticket");
    assert_eq!(ticket.quantity_redeemed, count);
}

#[then(expr = "exactly {int} scans are admitted, numbered 1 to {int}")]
async fn admitted_exactly(world: &mut TicketWorld, count: usize, last: i64) {
    let numbers = world
        .scans
        .iter()
        .filter_map(|s| match s {
            ScanResult::Admitted(a) => Some(a.scan_number),
            ScanResult::Rejected(_) => None,
        })
        .collect::<BTreeSet<_>>();
    assert_eq!(numbers.len(), count);
    assert_eq!(numbers, (1..=last).collect::<BTreeSet<_>>());
}

#[then(expr = "{int} scans are rejected as fully redeemed")]
async fn rejected_fully_redeemed(world: &mut TicketWorld, count: usize) {
    let rejected = world
        .scans
        .iter()
        .filter(|s| matches!(s, ScanResult::Rejected(ScanRejection::FullyRedeemed { .. })))
        .count();
    assert_eq!(rejected, count);
}
