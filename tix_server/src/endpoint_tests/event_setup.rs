use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{Duration, Utc};
use serde_json::json;

use super::helpers::TestBackend;

#[actix_web::test]
async fn invalid_events_are_refused() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let draft = json!({
        "host_id": "host_lagos",
        "title": "No tiers",
        "starts_at": Utc::now(),
        "tiers": [],
    });
    let (status, body) = backend.send(TestRequest::post().uri("/events").set_json(draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid event configuration. The event needs at least one ticket tier");

    let draft = json!({
        "host_id": "host_lagos",
        "title": "Free for all",
        "starts_at": Utc::now(),
        "tiers": [{"name": "General", "price": 0, "capacity": 0}],
    });
    let (status, _) = backend.send(TestRequest::post().uri("/events").set_json(draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    backend.tear_down().await;
}

#[actix_web::test]
async fn tiers_and_listing() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (event_id, _) = backend.create_event("Jazz Night", 1000, 10).await;
    let tier = json!({"name": "Backstage", "price": 5000, "capacity": 2, "active": false});
    let req = TestRequest::post().uri(&format!("/events/{event_id}/tiers")).set_json(tier);
    let (status, body) = backend.send(req).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["active"], false);

    // Buyers only see tiers that are on sale
    let (status, body) = backend.send(TestRequest::get().uri(&format!("/events/{event_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tiers"].as_array().unwrap().len(), 1);

    let (status, _) = backend.send(TestRequest::get().uri("/events/evt_missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    backend.tear_down().await;
}

#[actix_web::test]
async fn events_lock_once_tickets_are_sold() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (event_id, tier_id) = backend.create_event("Jazz Night", 1000, 10).await;
    let later = Utc::now() + Duration::days(30);
    let req = TestRequest::put().uri(&format!("/events/{event_id}/schedule")).set_json(json!({"starts_at": later}));
    let (status, body) = backend.send(req).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    backend.purchase(&tier_id, "usr_alice", 1).await;
    let req = TestRequest::put().uri(&format!("/events/{event_id}/schedule")).set_json(json!({"starts_at": Utc::now()}));
    let (status, body) = backend.send(req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        format!("Event {event_id} already has tickets issued against it and can no longer be changed")
    );
    backend.tear_down().await;
}
