use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;
use tix_engine::helpers::TokenCodec;

use super::helpers::TestBackend;

#[actix_web::test]
async fn admits_until_the_ticket_is_used_up() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (event_id, tier_id) = backend.create_event("Afrobeats Live", 1000, 10).await;
    let (_, body) = backend.purchase(&tier_id, "usr_alice", 2).await;
    let token = body["token"].as_str().unwrap().to_string();
    let ticket_id = body["ticket"]["id"].as_str().unwrap().to_string();

    let req = TestRequest::put().uri("/profiles/usr_alice").set_json(json!({"display_name": "Alice A."}));
    let (status, _) = backend.send(req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = backend.check_in(&event_id, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "admitted");
    assert_eq!(body["scan_number"], 1);
    assert_eq!(body["remaining"], 1);
    assert_eq!(body["buyer_name"], "Alice A.");

    let (_, body) = backend.check_in(&event_id, &token).await;
    assert_eq!(body["scan_number"], 2);
    assert_eq!(body["remaining"], 0);

    let (status, body) = backend.check_in(&event_id, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "rejected");
    assert_eq!(body["reason"], "fully_redeemed");

    let (status, body) = backend.send(TestRequest::get().uri(&format!("/tickets/{ticket_id}/scans"))).await;
    assert_eq!(status, StatusCode::OK);
    let scans = body.as_array().unwrap();
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0]["scan_number"], 1);
    assert_eq!(scans[1]["scan_number"], 2);
    backend.tear_down().await;
}

#[actix_web::test]
async fn rejected_scans_are_not_errors() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (jazz, jazz_tier) = backend.create_event("Jazz Night", 1000, 10).await;
    let (comedy, _) = backend.create_event("Comedy Club", 500, 10).await;
    let (_, body) = backend.purchase(&jazz_tier, "usr_bob", 1).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = backend.check_in(&comedy, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reason"], "wrong_event");
    assert_eq!(body["ticket_event"], "Jazz Night");
    assert_eq!(body["scanning_event"], "Comedy Club");

    let (status, body) = backend.check_in(&jazz, "garbage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reason"], "malformed");

    // The wrong-event scan did not use up the admission
    let (_, body) = backend.check_in(&jazz, &token).await;
    assert_eq!(body["result"], "admitted");
    backend.tear_down().await;
}

#[actix_web::test]
async fn signed_tokens_are_enforced() {
    let _ = env_logger::try_init();
    let backend = TestBackend::with_codec(TokenCodec::signed(b"front-door").unwrap()).await;
    let (event_id, tier_id) = backend.create_event("Jazz Night", 1000, 10).await;
    let (_, body) = backend.purchase(&tier_id, "usr_carol", 1).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(token.contains("\"sig\""));
    let ticket_id = body["ticket"]["id"].as_str().unwrap();

    let forged = TokenCodec::unsigned().encode(&ticket_id.into(), &event_id.as_str().into(), &"usr_carol".into());
    let (_, body) = backend.check_in(&event_id, &forged).await;
    assert_eq!(body["reason"], "bad_signature");

    let (_, body) = backend.check_in(&event_id, &token).await;
    assert_eq!(body["result"], "admitted");
    backend.tear_down().await;
}
