//! Ticket sales.
//!
//! A purchase is a two-step saga over the backend: claim capacity on the tier, then create the ticket. The steps are
//! separate backend calls and do not share a transaction. If the second step fails, the first is undone by releasing
//! the same quantity.
use std::fmt::Debug;

use log::*;
use tix_common::FeeRate;

use crate::{
    db_types::{BuyerId, NewTicket, Ticket, TicketTier, TierId},
    events::{EventProducers, TicketPurchasedEvent},
    helpers::{retry_transient, RetryPolicy},
    tix_api::{
        errors::PurchaseError,
        purchase_objects::{PriceQuote, PurchaseStage},
    },
    traits::{ReserveOutcome, StorageError, TicketStore, TierLedger},
};

pub struct PurchaseApi<B> {
    db: B,
    fee_rate: FeeRate,
    retry: RetryPolicy,
    producers: EventProducers,
}

impl<B> Debug for PurchaseApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PurchaseApi (fee rate {})", self.fee_rate)
    }
}

impl<B> PurchaseApi<B> {
    pub fn new(db: B, fee_rate: FeeRate, retry: RetryPolicy, producers: EventProducers) -> Self {
        Self { db, fee_rate, retry, producers }
    }
}

/// Tracks one purchase through its stages and logs every transition.
struct PurchaseAttempt<'a> {
    tier_id: &'a TierId,
    buyer_id: &'a BuyerId,
    quantity: i64,
    stage: PurchaseStage,
}

impl<'a> PurchaseAttempt<'a> {
    fn new(tier_id: &'a TierId, buyer_id: &'a BuyerId, quantity: i64) -> Self {
        trace!("🎟️ Purchase of {quantity} on tier {tier_id} for {buyer_id}: {}", PurchaseStage::Requested);
        Self { tier_id, buyer_id, quantity, stage: PurchaseStage::Requested }
    }

    fn advance(&mut self, next: PurchaseStage) {
        trace!(
            "🎟️ Purchase of {} on tier {} for {}: {} -> {next}",
            self.quantity,
            self.tier_id,
            self.buyer_id,
            self.stage
        );
        self.stage = next;
    }

    fn reject(&mut self, err: PurchaseError) -> PurchaseError {
        self.advance(PurchaseStage::Rejected);
        debug!("🎟️ Purchase on tier {} for {} rejected. {err}", self.tier_id, self.buyer_id);
        err
    }
}

impl<B> PurchaseApi<B>
where B: TierLedger + TicketStore
{
    /// Prices a prospective purchase at the tier's current price without touching capacity.
    pub async fn quote(&self, tier_id: &TierId, quantity: i64) -> Result<PriceQuote, PurchaseError> {
        let db = &self.db;
        let tier = retry_transient(&self.retry, "fetch tier", move || db.fetch_tier(tier_id))
            .await?
            .ok_or_else(|| PurchaseError::TierNotFound(tier_id.clone()))?;
        PriceQuote::calculate(tier.price, quantity, self.fee_rate)
    }

    /// Buys `quantity` admissions on the tier for the buyer.
    ///
    /// Capacity is claimed with a single conditional update, so concurrent buyers can never push a tier past its
    /// capacity. If the ticket cannot be created afterwards, the claimed capacity is released again and
    /// [`PurchaseError::StorageFailure`] is returned. Should that release also fail, the capacity stays claimed: an
    /// undersold tier is recoverable, an oversold one is not.
    pub async fn purchase(
        &self,
        tier_id: &TierId,
        buyer_id: &BuyerId,
        quantity: i64,
    ) -> Result<Ticket, PurchaseError> {
        let mut attempt = PurchaseAttempt::new(tier_id, buyer_id, quantity);
        if quantity <= 0 {
            return Err(attempt.reject(PurchaseError::InvalidQuantity(quantity)));
        }
        let db = &self.db;
        let outcome = retry_transient(&self.retry, "reserve capacity", move || db.reserve(tier_id, quantity)).await;
        let tier = match outcome {
            Ok(ReserveOutcome::Reserved(tier)) => tier,
            Ok(ReserveOutcome::CapacityExceeded { requested, remaining }) => {
                let err = PurchaseError::SoldOut { tier_id: tier_id.clone(), requested, remaining };
                return Err(attempt.reject(err));
            },
            Ok(ReserveOutcome::TierInactive) => return Err(attempt.reject(PurchaseError::TierInactive(tier_id.clone()))),
            Ok(ReserveOutcome::TierNotFound) => return Err(attempt.reject(PurchaseError::TierNotFound(tier_id.clone()))),
            Err(e) => return Err(attempt.reject(e.into())),
        };
        attempt.advance(PurchaseStage::CapacityReserved);

        let quote = match PriceQuote::calculate(tier.price, quantity, self.fee_rate) {
            Ok(q) => q,
            Err(e) => {
                self.release_capacity(&mut attempt).await;
                return Err(e);
            },
        };
        let new_ticket = NewTicket::new(&tier, buyer_id.clone(), quantity, quote.service_fee);
        let ticket = match self.create_ticket(&new_ticket).await {
            Ok(ticket) => ticket,
            Err(e) => {
                error!("🎟️ Capacity was reserved on tier {tier_id} but the ticket could not be created. {e}");
                self.release_capacity(&mut attempt).await;
                return Err(PurchaseError::StorageFailure(e));
            },
        };
        attempt.advance(PurchaseStage::TicketCreated);
        log_sale(&tier, &ticket, &quote);

        self.producers.publish_ticket_purchased(TicketPurchasedEvent::new(ticket.clone())).await;
        attempt.advance(PurchaseStage::Committed);
        Ok(ticket)
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, StorageError> {
        let db = &self.db;
        retry_transient(&self.retry, "create ticket", move || db.create_ticket(ticket)).await
    }

    /// The compensating step of the purchase saga.
    async fn release_capacity(&self, attempt: &mut PurchaseAttempt<'_>) {
        let db = &self.db;
        let (tier_id, quantity) = (attempt.tier_id, attempt.quantity);
        match retry_transient(&self.retry, "release capacity", move || db.release(tier_id, quantity)).await {
            Ok(Some(_)) => {
                attempt.advance(PurchaseStage::CapacityReleased);
                info!("🎟️ Released {quantity} units on tier {tier_id} after a failed purchase");
            },
            Ok(None) => {
                error!(
                    "🎟️ Could not release {quantity} units on tier {tier_id}. The tier will undersell by that amount \
                     until it is corrected by hand."
                );
            },
            Err(e) => {
                error!(
                    "🎟️ Releasing {quantity} units on tier {tier_id} failed. The tier will undersell by that amount \
                     until it is corrected by hand. {e}"
                );
            },
        }
    }
}

fn log_sale(tier: &TicketTier, ticket: &Ticket, quote: &PriceQuote) {
    info!(
        "🎟️ Ticket {} sold to {}: {} x '{}' at {} + {} fee = {}. {} of {} sold",
        ticket.id,
        ticket.buyer_id,
        ticket.quantity_purchased,
        tier.name,
        quote.unit_price,
        quote.service_fee,
        quote.total,
        tier.sold,
        tier.capacity
    );
}
