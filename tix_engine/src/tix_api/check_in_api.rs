//! Door check-in.
//!
//! A scan decodes the presented token, then asks the store to consume one admission in a single conditional update.
//! This API adds no locking of its own. Any number of scanners may present the same token at once; at most
//! `quantity_purchased` of them are admitted.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{BuyerId, EventId, TicketId},
    events::{EventProducers, TicketRedeemedEvent},
    helpers::{retry_transient, RetryPolicy, TokenCodec, TokenError},
    tix_api::{
        errors::CheckInError,
        scan_objects::{Admission, ScanRejection, ScanResult},
    },
    traits::{DisplayDirectory, RedeemOutcome, Redeemed, TicketStore},
};

pub struct CheckInApi<B> {
    db: B,
    codec: TokenCodec,
    retry: RetryPolicy,
    producers: EventProducers,
}

impl<B> Debug for CheckInApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckInApi ({:?})", self.codec)
    }
}

impl<B> CheckInApi<B> {
    pub fn new(db: B, codec: TokenCodec, retry: RetryPolicy, producers: EventProducers) -> Self {
        Self { db, codec, retry, producers }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}

impl<B> CheckInApi<B>
where B: TicketStore + DisplayDirectory
{
    /// Validates a scanned token for `expected_event` and, if it is good, consumes one admission.
    ///
    /// Every business reason for turning a guest away comes back as `Ok(ScanResult::Rejected(..))`. An `Err` means
    /// the store could not be reached even after retrying, and the guest should scan again.
    pub async fn check_in(&self, token: &str, expected_event: &EventId) -> Result<ScanResult, CheckInError> {
        let token = match self.codec.decode(token) {
            Ok(token) => token,
            Err(TokenError::BadSignature) => {
                warn!("🚪 A ticket token with a missing or forged signature was presented for event {expected_event}");
                return Ok(ScanResult::Rejected(ScanRejection::BadSignature));
            },
            Err(e) => {
                debug!("🚪 Unreadable code presented for event {expected_event}. {e}");
                return Ok(ScanResult::Rejected(ScanRejection::Malformed));
            },
        };
        let ticket_id = &token.ticket_id;
        let db = &self.db;
        let existing = retry_transient(&self.retry, "load ticket", move || db.fetch_ticket(ticket_id)).await?;
        let Some(existing) = existing else {
            debug!("🚪 Ticket {ticket_id} presented for event {expected_event} does not exist");
            return Ok(ScanResult::Rejected(ScanRejection::NotFound));
        };
        if token.event_id != existing.event_id || token.buyer_id != existing.buyer_id {
            warn!(
                "🚪 Token for ticket {ticket_id} names event {} and buyer {}, which do not match the stored ticket",
                token.event_id, token.buyer_id
            );
            return Ok(ScanResult::Rejected(ScanRejection::Malformed));
        }

        let outcome = retry_transient(&self.retry, "redeem ticket", move || db.redeem(ticket_id, expected_event)).await?;
        let result = match outcome {
            RedeemOutcome::Redeemed(redeemed) => self.admit(redeemed).await,
            RedeemOutcome::NotFound => ScanRejection::NotFound.into(),
            RedeemOutcome::WrongEvent { ticket_event } => {
                let ticket_event = self.event_title(&ticket_event).await;
                let scanning_event = self.event_title(expected_event).await;
                ScanRejection::WrongEvent { ticket_event, scanning_event }.into()
            },
            RedeemOutcome::PaymentIncomplete(payment_state) => {
                ScanRejection::PaymentIncomplete { payment_state }.into()
            },
            RedeemOutcome::FullyRedeemed { quantity_purchased } => {
                ScanRejection::FullyRedeemed { quantity_purchased }.into()
            },
        };
        if let ScanResult::Rejected(reason) = &result {
            info!("🚪 Ticket {ticket_id} turned away at event {expected_event}: {reason}");
        }
        Ok(result)
    }

    /// The door token for an existing ticket.
    pub async fn token_for(&self, ticket_id: &TicketId) -> Result<Option<String>, CheckInError> {
        let db = &self.db;
        let ticket = retry_transient(&self.retry, "load ticket", move || db.fetch_ticket(ticket_id)).await?;
        Ok(ticket.map(|t| self.codec.encode(&t.id, &t.event_id, &t.buyer_id)))
    }

    async fn admit(&self, redeemed: Redeemed) -> ScanResult {
        let Redeemed { ticket, scan_number, remaining } = redeemed;
        let buyer_name = self.buyer_name(&ticket.buyer_id).await;
        info!(
            "🚪 {buyer_name} admitted on ticket {}. Entry {scan_number} of {}, {remaining} remaining",
            ticket.id, ticket.quantity_purchased
        );
        let admission = Admission {
            ticket_id: ticket.id.clone(),
            scan_number,
            total_tickets: ticket.quantity_purchased,
            remaining,
            buyer_name,
            redemption_state: ticket.redemption_state(),
        };
        self.producers.publish_ticket_redeemed(TicketRedeemedEvent::new(ticket, scan_number)).await;
        ScanResult::Admitted(admission)
    }

    /// Display names are cosmetic, so lookup failures fall back to the raw id rather than failing the scan.
    async fn buyer_name(&self, buyer_id: &BuyerId) -> String {
        match self.db.buyer_name(buyer_id).await {
            Ok(Some(name)) => name,
            Ok(None) => buyer_id.to_string(),
            Err(e) => {
                warn!("🚪 Could not look up the name for buyer {buyer_id}. {e}");
                buyer_id.to_string()
            },
        }
    }

    async fn event_title(&self, event_id: &EventId) -> String {
        match self.db.event_title(event_id).await {
            Ok(Some(title)) => title,
            Ok(None) => event_id.to_string(),
            Err(e) => {
                warn!("🚪 Could not look up the title for event {event_id}. {e}");
                event_id.to_string()
            },
        }
    }
}
