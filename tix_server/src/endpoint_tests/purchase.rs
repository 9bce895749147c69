use actix_web::{http::StatusCode, test::TestRequest};

use super::helpers::TestBackend;

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (status, body) = backend.send(TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
    backend.tear_down().await;
}

#[actix_web::test]
async fn purchase_returns_ticket_total_and_token() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (_, tier_id) = backend.create_event("Afrobeats Live", 1000, 10).await;
    let (status, body) = backend.purchase(&tier_id, "usr_alice", 2).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["total"], 2140);
    assert_eq!(body["ticket"]["quantity_purchased"], 2);
    assert_eq!(body["ticket"]["service_fee"], 140);
    assert_eq!(body["ticket"]["payment_state"], "completed");
    let token = body["token"].as_str().unwrap();
    assert!(token.contains(body["ticket"]["id"].as_str().unwrap()));

    let (status, body) = backend.send(TestRequest::get().uri(&format!("/tiers/{tier_id}/availability"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sold"], 2);
    assert_eq!(body["remaining"], 8);
    backend.tear_down().await;
}

#[actix_web::test]
async fn sold_out_is_a_conflict() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (_, tier_id) = backend.create_event("Small Room", 500, 3).await;
    let (status, _) = backend.purchase(&tier_id, "usr_alice", 2).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = backend.purchase(&tier_id, "usr_bob", 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], format!("No tickets left on tier {tier_id}. 2 requested but only 1 remain"));
    backend.tear_down().await;
}

#[actix_web::test]
async fn bad_purchases() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (_, tier_id) = backend.create_event("Small Room", 500, 3).await;
    let (status, _) = backend.purchase(&tier_id, "usr_alice", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = backend.purchase("tier_nope", "usr_alice", 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Ticket tier tier_nope does not exist");

    let req = TestRequest::put().uri(&format!("/tiers/{tier_id}/active")).set_json(serde_json::json!({"active": false}));
    let (status, body) = backend.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
    let (status, _) = backend.purchase(&tier_id, "usr_alice", 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    backend.tear_down().await;
}
