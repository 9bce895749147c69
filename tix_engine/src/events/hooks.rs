use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, TicketPurchasedEvent, TicketRedeemedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub ticket_purchased_producer: Vec<EventProducer<TicketPurchasedEvent>>,
    pub ticket_redeemed_producer: Vec<EventProducer<TicketRedeemedEvent>>,
}

impl EventProducers {
    pub async fn publish_ticket_purchased(&self, event: TicketPurchasedEvent) {
        for producer in &self.ticket_purchased_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_ticket_redeemed(&self, event: TicketRedeemedEvent) {
        for producer in &self.ticket_redeemed_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_ticket_purchased: Option<EventHandler<TicketPurchasedEvent>>,
    pub on_ticket_redeemed: Option<EventHandler<TicketRedeemedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_ticket_purchased = hooks.on_ticket_purchased.map(|f| EventHandler::new(buffer_size, f));
        let on_ticket_redeemed = hooks.on_ticket_redeemed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_ticket_purchased, on_ticket_redeemed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_ticket_purchased {
            result.ticket_purchased_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_ticket_redeemed {
            result.ticket_redeemed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_ticket_purchased {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_ticket_redeemed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_ticket_purchased: Option<Handler<TicketPurchasedEvent>>,
    pub on_ticket_redeemed: Option<Handler<TicketRedeemedEvent>>,
}

impl EventHooks {
    pub fn on_ticket_purchased<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TicketPurchasedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_ticket_purchased = Some(Arc::new(f));
        self
    }

    pub fn on_ticket_redeemed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(TicketRedeemedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_ticket_redeemed = Some(Arc::new(f));
        self
    }
}
