use actix_web::{
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
};
use chrono::{Duration, Utc};
use log::debug;
use serde_json::{json, Value};
use sqlx::{migrate::MigrateDatabase, Sqlite};
use tix_engine::{
    events::EventProducers,
    helpers::{RetryPolicy, TokenCodec},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    AvailabilityApi,
    CheckInApi,
    EventSetupApi,
    PurchaseApi,
    SqliteDatabase,
};

use crate::server::configure_routes;

/// A throwaway database plus everything needed to drive requests through the real route table.
pub struct TestBackend {
    pub url: String,
    pub db: SqliteDatabase,
    pub codec: TokenCodec,
}

impl TestBackend {
    pub async fn new() -> Self {
        Self::with_codec(TokenCodec::unsigned()).await
    }

    pub async fn with_codec(codec: TokenCodec) -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
        Self { url, db, codec }
    }

    pub async fn send(&self, req: TestRequest) -> (StatusCode, Value) {
        let retry = RetryPolicy::new(5, std::time::Duration::from_millis(5));
        let producers = EventProducers::default();
        let app = App::new()
            .app_data(web::Data::new(PurchaseApi::new(self.db.clone(), Default::default(), retry, producers.clone())))
            .app_data(web::Data::new(CheckInApi::new(self.db.clone(), self.codec.clone(), retry, producers)))
            .app_data(web::Data::new(AvailabilityApi::new(self.db.clone(), self.codec.clone())))
            .app_data(web::Data::new(EventSetupApi::new(self.db.clone())))
            .configure(configure_routes::<SqliteDatabase>);
        let service = test::init_service(app).await;
        debug!("Making request");
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        let body = serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into()));
        (status, body)
    }

    /// Creates an event starting tomorrow with a single tier and returns `(event_id, tier_id)`.
    pub async fn create_event(&self, title: &str, price: i64, capacity: i64) -> (String, String) {
        let draft = json!({
            "host_id": "host_lagos",
            "title": title,
            "starts_at": Utc::now() + Duration::days(1),
            "tiers": [{"name": "General", "price": price, "capacity": capacity}],
        });
        let (status, body) = self.send(TestRequest::post().uri("/events").set_json(draft)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let event_id = body["event"]["id"].as_str().unwrap().to_string();
        let tier_id = body["tiers"][0]["id"].as_str().unwrap().to_string();
        (event_id, tier_id)
    }

    pub async fn purchase(&self, tier_id: &str, buyer: &str, quantity: i64) -> (StatusCode, Value) {
        let req = TestRequest::post()
            .uri(&format!("/tiers/{tier_id}/purchase"))
            .set_json(json!({"buyer_id": buyer, "quantity": quantity}));
        self.send(req).await
    }

    pub async fn check_in(&self, event_id: &str, token: &str) -> (StatusCode, Value) {
        let req = TestRequest::post().uri(&format!("/events/{event_id}/check_in")).set_json(json!({"token": token}));
        self.send(req).await
    }

    pub async fn tear_down(self) {
        self.db.pool().close().await;
        if let Err(e) = Sqlite::drop_database(&self.url).await {
            debug!("Could not remove test database {}: {e}", self.url);
        }
    }
}
