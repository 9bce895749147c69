use actix_web::{http::StatusCode, test::TestRequest};

use super::helpers::TestBackend;

#[actix_web::test]
async fn event_and_host_summaries() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (event_id, tier_id) = backend.create_event("Jazz Night", 1000, 10).await;
    let (_, second_tier) = backend.create_event("Comedy Club", 500, 5).await;
    backend.purchase(&tier_id, "usr_alice", 3).await;
    backend.purchase(&second_tier, "usr_bob", 1).await;

    let (status, body) = backend.send(TestRequest::get().uri(&format!("/events/{event_id}/availability"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_capacity"], 10);
    assert_eq!(body["total_sold"], 3);
    assert_eq!(body["revenue"], 3000);
    assert_eq!(body["fees"], 210);

    let (status, body) = backend.send(TestRequest::get().uri("/hosts/host_lagos/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_count"], 2);
    assert_eq!(body["upcoming_events"], 2);
    assert_eq!(body["total_capacity"], 15);
    assert_eq!(body["total_sold"], 4);
    assert_eq!(body["revenue"], 3500);
    backend.tear_down().await;
}

#[actix_web::test]
async fn my_tickets() {
    let _ = env_logger::try_init();
    let backend = TestBackend::new().await;
    let (_, tier_id) = backend.create_event("Jazz Night", 1000, 10).await;
    let (_, body) = backend.purchase(&tier_id, "usr_alice", 2).await;
    let token = body["token"].clone();

    let (status, body) = backend.send(TestRequest::get().uri("/buyers/usr_alice/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    let tickets = body.as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["event_title"], "Jazz Night");
    assert_eq!(tickets[0]["token"], token);

    let (status, body) = backend.send(TestRequest::get().uri("/buyers/usr_nobody/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
    backend.tear_down().await;
}
