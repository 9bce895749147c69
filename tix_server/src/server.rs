use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use tix_engine::{events::EventProducers, AvailabilityApi, CheckInApi, EventSetupApi, PurchaseApi, SqliteDatabase};

use crate::{
    audit::create_audit_event_handlers,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        AddTierRoute,
        CheckInRoute,
        CreateEventRoute,
        EventAvailabilityRoute,
        EventRoute,
        HostSummaryRoute,
        MyTicketsRoute,
        PurchaseRoute,
        RescheduleRoute,
        ScanHistoryRoute,
        SetTierActiveRoute,
        TierAvailabilityRoute,
        UpdateProfileRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    } else {
        info!("🗃️ TIX_RUN_MIGRATIONS is off. Assuming the database schema is up to date.");
    }
    let handlers = create_audit_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(ServerError::IOError)
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let codec = config.token_codec().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    info!("🪛️ Ticket tokens are {}", if codec.is_signing() { "signed" } else { "unsigned" });
    let srv = HttpServer::new(move || {
        let purchase_api = PurchaseApi::new(db.clone(), config.service_fee, config.retry, producers.clone());
        let check_in_api = CheckInApi::new(db.clone(), codec.clone(), config.retry, producers.clone());
        let availability_api = AvailabilityApi::new(db.clone(), codec.clone());
        let setup_api = EventSetupApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tix::access_log"))
            .app_data(web::Data::new(purchase_api))
            .app_data(web::Data::new(check_in_api))
            .app_data(web::Data::new(availability_api))
            .app_data(web::Data::new(setup_api))
            .configure(configure_routes::<SqliteDatabase>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route against backend `B`. The APIs themselves must already be registered as app data.
pub fn configure_routes<B: tix_engine::TicketingDatabase + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(CreateEventRoute::<B>::new())
        .service(EventRoute::<B>::new())
        .service(AddTierRoute::<B>::new())
        .service(RescheduleRoute::<B>::new())
        .service(EventAvailabilityRoute::<B>::new())
        .service(CheckInRoute::<B>::new())
        .service(SetTierActiveRoute::<B>::new())
        .service(TierAvailabilityRoute::<B>::new())
        .service(PurchaseRoute::<B>::new())
        .service(HostSummaryRoute::<B>::new())
        .service(MyTicketsRoute::<B>::new())
        .service(ScanHistoryRoute::<B>::new())
        .service(UpdateProfileRoute::<B>::new());
}
