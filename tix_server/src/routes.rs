//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! | Method | Path                              | Handler                |
//! |--------|-----------------------------------|------------------------|
//! | GET    | `/health`                         | [`health`]             |
//! | POST   | `/events`                         | [`create_event`]       |
//! | GET    | `/events/{event_id}`              | [`event`]              |
//! | POST   | `/events/{event_id}/tiers`        | [`add_tier`]           |
//! | PUT    | `/events/{event_id}/schedule`     | [`reschedule`]         |
//! | GET    | `/events/{event_id}/availability` | [`event_availability`] |
//! | POST   | `/events/{event_id}/check_in`     | [`check_in`]           |
//! | PUT    | `/tiers/{tier_id}/active`         | [`set_tier_active`]    |
//! | GET    | `/tiers/{tier_id}/availability`   | [`tier_availability`]  |
//! | POST   | `/tiers/{tier_id}/purchase`       | [`purchase`]           |
//! | GET    | `/hosts/{host_id}/summary`        | [`host_summary`]       |
//! | GET    | `/buyers/{buyer_id}/tickets`      | [`my_tickets`]         |
//! | GET    | `/tickets/{ticket_id}/scans`      | [`scan_history`]       |
//! | PUT    | `/profiles/{buyer_id}`            | [`update_profile`]     |
//!
//! Every handler awaits the engine, which never blocks the worker thread. Long-running synchronous work does not
//! belong in a handler, since each worker processes its requests sequentially.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use tix_engine::{
    db_types::{BuyerId, EventId, HostId, TicketId, TierId},
    tix_api::setup_objects::{EventDraft, TierDraft},
    AvailabilityApi,
    CheckInApi,
    EventSetupApi,
    PurchaseApi,
    TicketingDatabase,
};

use crate::{
    data_objects::{
        CheckInRequest,
        ProfileRequest,
        PurchaseRequest,
        PurchaseResponse,
        ScheduleRequest,
        TierActiveRequest,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Event setup  ----------------------------------------------------
route!(create_event => Post "/events" impl TicketingDatabase);
/// Creates an event together with its ticket tiers. Tiers are listed to buyers in the order they are given.
pub async fn create_event<B: TicketingDatabase>(
    body: web::Json<EventDraft>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let draft = body.into_inner();
    debug!("💻️ POST create_event({})", draft.title);
    let event = api.create_event(draft).await?;
    Ok(HttpResponse::Created().json(event))
}

route!(event => Get "/events/{event_id}" impl TicketingDatabase);
/// The event and the tiers that are currently on sale.
pub async fn event<B: TicketingDatabase>(
    path: web::Path<EventId>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = path.into_inner();
    debug!("💻️ GET event({event_id})");
    let event = api.event_with_tiers(&event_id, true).await?;
    Ok(HttpResponse::Ok().json(event))
}

route!(add_tier => Post "/events/{event_id}/tiers" impl TicketingDatabase);
pub async fn add_tier<B: TicketingDatabase>(
    path: web::Path<EventId>,
    body: web::Json<TierDraft>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = path.into_inner();
    debug!("💻️ POST add_tier({event_id})");
    let tier = api.add_tier(&event_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(tier))
}

route!(reschedule => Put "/events/{event_id}/schedule" impl TicketingDatabase);
/// Moves the event's start time. Refused with 409 once any ticket has been issued for the event.
pub async fn reschedule<B: TicketingDatabase>(
    path: web::Path<EventId>,
    body: web::Json<ScheduleRequest>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = path.into_inner();
    debug!("💻️ PUT reschedule({event_id})");
    let event = api.reschedule(&event_id, body.starts_at).await?;
    Ok(HttpResponse::Ok().json(event))
}

route!(set_tier_active => Put "/tiers/{tier_id}/active" impl TicketingDatabase);
pub async fn set_tier_active<B: TicketingDatabase>(
    path: web::Path<TierId>,
    body: web::Json<TierActiveRequest>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tier_id = path.into_inner();
    debug!("💻️ PUT set_tier_active({tier_id}, {})", body.active);
    let tier = api.set_tier_active(&tier_id, body.active).await?;
    Ok(HttpResponse::Ok().json(tier))
}

route!(update_profile => Put "/profiles/{buyer_id}" impl TicketingDatabase);
pub async fn update_profile<B: TicketingDatabase>(
    path: web::Path<BuyerId>,
    body: web::Json<ProfileRequest>,
    api: web::Data<EventSetupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    debug!("💻️ PUT update_profile({buyer_id})");
    let profile = api.upsert_profile(&buyer_id, &body.display_name).await?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Purchase  ----------------------------------------------------
route!(purchase => Post "/tiers/{tier_id}/purchase" impl TicketingDatabase);
/// Buys `quantity` admissions on a tier as a single ticket.
///
/// The response carries the stored ticket, the total charged (subtotal plus service fee) and the token the buyer
/// presents at the door. A tier without enough capacity left answers 409 and nothing is charged.
pub async fn purchase<B: TicketingDatabase>(
    path: web::Path<TierId>,
    body: web::Json<PurchaseRequest>,
    api: web::Data<PurchaseApi<B>>,
    check_in_api: web::Data<CheckInApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tier_id = path.into_inner();
    let PurchaseRequest { buyer_id, quantity } = body.into_inner();
    debug!("💻️ POST purchase({tier_id}, {buyer_id}, {quantity})");
    let ticket = api.purchase(&tier_id, &buyer_id, quantity).await?;
    let token = check_in_api.codec().encode(&ticket.id, &ticket.event_id, &ticket.buyer_id);
    Ok(HttpResponse::Created().json(PurchaseResponse::new(ticket, token)))
}

//----------------------------------------------   Check-in  ----------------------------------------------------
route!(check_in => Post "/events/{event_id}/check_in" impl TicketingDatabase);
/// Redeems one admission from a scanned token.
///
/// Turned-away guests are a normal outcome at the door, so rejected scans are returned with a 200 status and a
/// `"result": "rejected"` body. Only storage failures produce an error status.
pub async fn check_in<B: TicketingDatabase>(
    path: web::Path<EventId>,
    body: web::Json<CheckInRequest>,
    api: web::Data<CheckInApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = path.into_inner();
    debug!("💻️ POST check_in({event_id})");
    let result = api.check_in(&body.token, &event_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Availability  ----------------------------------------------------
route!(tier_availability => Get "/tiers/{tier_id}/availability" impl TicketingDatabase);
pub async fn tier_availability<B: TicketingDatabase>(
    path: web::Path<TierId>,
    api: web::Data<AvailabilityApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let tier_id = path.into_inner();
    trace!("💻️ GET tier_availability({tier_id})");
    let availability = api.tier_availability(&tier_id).await?;
    Ok(HttpResponse::Ok().json(availability))
}

route!(event_availability => Get "/events/{event_id}/availability" impl TicketingDatabase);
pub async fn event_availability<B: TicketingDatabase>(
    path: web::Path<EventId>,
    api: web::Data<AvailabilityApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let event_id = path.into_inner();
    trace!("💻️ GET event_availability({event_id})");
    let summary = api.event_summary(&event_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(host_summary => Get "/hosts/{host_id}/summary" impl TicketingDatabase);
/// The host dashboard: every event the host runs, with sales, redemptions and revenue.
pub async fn host_summary<B: TicketingDatabase>(
    path: web::Path<HostId>,
    api: web::Data<AvailabilityApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let host_id = path.into_inner();
    debug!("💻️ GET host_summary({host_id})");
    let summary = api.host_summary(&host_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(my_tickets => Get "/buyers/{buyer_id}/tickets" impl TicketingDatabase);
/// A buyer's paid tickets, newest first, each with the token to present at the door.
pub async fn my_tickets<B: TicketingDatabase>(
    path: web::Path<BuyerId>,
    api: web::Data<AvailabilityApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let buyer_id = path.into_inner();
    debug!("💻️ GET my_tickets({buyer_id})");
    let tickets = api.tickets_for_buyer(&buyer_id).await?;
    Ok(HttpResponse::Ok().json(tickets))
}

route!(scan_history => Get "/tickets/{ticket_id}/scans" impl TicketingDatabase);
pub async fn scan_history<B: TicketingDatabase>(
    path: web::Path<TicketId>,
    api: web::Data<AvailabilityApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let ticket_id = path.into_inner();
    debug!("💻️ GET scan_history({ticket_id})");
    let scans = api.scan_history(&ticket_id).await?;
    Ok(HttpResponse::Ok().json(scans))
}
