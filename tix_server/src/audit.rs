//! Audit trail for sales and admissions.
//!
//! Purchases and redemptions are published by the engine as events. The handlers here write them to the
//! `tix::audit` log target, so that box office and door activity can be routed to a separate log if desired.
use std::{future::Future, pin::Pin};

use log::*;
use tix_engine::events::{EventHandlers, EventHooks, TicketPurchasedEvent, TicketRedeemedEvent};

pub const AUDIT_EVENT_BUFFER_SIZE: usize = 100;

pub fn create_audit_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_ticket_purchased(|ev: TicketPurchasedEvent| -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let ticket = ev.ticket;
        Box::pin(async move {
            info!(
                target: "tix::audit",
                "📬️ SALE ticket={} event={} tier={} buyer={} qty={} total={}",
                ticket.id,
                ticket.event_id,
                ticket.tier_id,
                ticket.buyer_id,
                ticket.quantity_purchased,
                ticket.total_paid()
            );
        })
    });
    hooks.on_ticket_redeemed(|ev: TicketRedeemedEvent| -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let TicketRedeemedEvent { ticket, scan_number } = ev;
        Box::pin(async move {
            info!(
                target: "tix::audit",
                "📬️ ENTRY ticket={} event={} scan={scan_number}/{}",
                ticket.id,
                ticket.event_id,
                ticket.quantity_purchased
            );
        })
    });
    EventHandlers::new(AUDIT_EVENT_BUFFER_SIZE, hooks)
}
