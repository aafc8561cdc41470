use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::grants::applications::lifecycle::ReviewTarget;
use crate::workflows::grants::catalog::GrantCatalog;

const MUNICIPALITY: &str = "भद्रपुर नगरपालिका";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serializes")))
        .expect("request builds")
}

fn seeded_router() -> (axum::Router, Arc<TestService>) {
    let (service, _repository, catalog) = service();
    catalog.insert(grant(1, 5, MUNICIPALITY)).expect("grant stored");
    let directory = Arc::new(MemoryDirectory::default());
    directory.register(farmer("f-1", 5, MUNICIPALITY));
    directory.register(farmer("f-2", 5, MUNICIPALITY));
    let router = router_api(service.clone(), directory);
    (router, service)
}

fn submit_payload(farmer_id: &str) -> Value {
    json!({
        "farmer_id": farmer_id,
        "grant_id": 1,
        "snapshot": snapshot(5, MUNICIPALITY),
    })
}

#[tokio::test]
async fn submit_route_creates_application() {
    let (router, _service) = seeded_router();

    let response = router
        .oneshot(post("/api/v1/applications", submit_payload("f-1")))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["grant_id"], 1);
}

#[tokio::test]
async fn submit_route_rejects_unknown_farmer() {
    let (router, _service) = seeded_router();

    let response = router
        .oneshot(post("/api/v1/applications", submit_payload("ghost")))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_submission_maps_to_conflict() {
    let (router, _service) = seeded_router();

    let first = router
        .clone()
        .oneshot(post("/api/v1/applications", submit_payload("f-1")))
        .await
        .expect("router responds");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(post("/api/v1/applications", submit_payload("f-1")))
        .await
        .expect("router responds");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_route_approves_and_then_conflicts() {
    let (router, service) = seeded_router();
    let record = service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");

    let uri = format!("/api/v1/applications/{}/status", record.id.0);
    let payload = json!({
        "status": "approved",
        "remarks": "Verified in person",
        "reviewed_by": "admin-1",
    });

    let response = router
        .clone()
        .oneshot(post(&uri, payload.clone()))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "approved");
    assert_eq!(body["admin_remarks"], "Verified in person");

    let retry = router
        .oneshot(post(&uri, json!({ "status": "rejected", "reviewed_by": "admin-2" })))
        .await
        .expect("router responds");
    assert_eq!(retry.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn mark_viewed_route_reports_idempotence() {
    let (router, service) = seeded_router();
    let record = service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");

    let uri = format!("/api/v1/applications/{}/viewed", record.id.0);
    let payload = json!({ "reviewed_by": "admin-1" });

    let first = router
        .clone()
        .oneshot(post(&uri, payload.clone()))
        .await
        .expect("router responds");
    let first_body = body_json(first).await;
    assert_eq!(first_body["transitioned"], true);
    assert_eq!(first_body["application"]["status"], "processing");

    let second = router.oneshot(post(&uri, payload)).await.expect("router responds");
    let second_body = body_json(second).await;
    assert_eq!(second_body["transitioned"], false);
    assert_eq!(second_body["application"]["status"], "processing");
}

#[tokio::test]
async fn bulk_status_route_reports_per_item_outcomes() {
    let (router, service) = seeded_router();
    let first = service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");
    let second = service
        .submit(&farmer("f-2", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");
    service
        .update_status(second.id, ReviewTarget::Rejected, None, "admin-1")
        .expect("rejection succeeds");

    let payload = json!({
        "application_ids": [first.id.0, second.id.0, 999],
        "status": "approved",
        "reviewed_by": "admin-1",
    });
    let response = router
        .oneshot(post("/api/v1/applications/bulk-status", payload))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["outcome"], "updated");
    assert_eq!(results[1]["outcome"], "skipped_terminal");
    assert_eq!(results[2]["outcome"], "not_found");
}

#[tokio::test]
async fn eligible_grants_route_filters_by_area() {
    let (service, _repository, catalog) = service();
    catalog.insert(grant(1, 5, "A")).expect("grant stored");
    catalog.insert(grant(2, 5, "B")).expect("grant stored");
    let directory = Arc::new(MemoryDirectory::default());
    directory.register(farmer("f-b", 5, "B"));
    let router = router_api(service, directory);

    let response = router
        .oneshot(
            Request::get("/api/v1/farmers/f-b/eligible-grants")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let grants = body.as_array().expect("grants array");
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0]["id"], 2);
}

#[tokio::test]
async fn ranking_route_orders_by_priority() {
    let (router, service) = seeded_router();
    service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");
    let mut low = submission(1, 5, MUNICIPALITY);
    low.snapshot.monthly_income_rs = 35_000;
    low.snapshot.land_size = 7.0;
    low.snapshot.previous_grants = 3;
    service
        .submit(&farmer("f-2", 5, MUNICIPALITY), low)
        .expect("submission accepted");

    let response = router
        .oneshot(
            Request::get("/api/v1/grants/1/ranking")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ranking = body.as_array().expect("ranking array");
    assert_eq!(ranking.len(), 2);
    let top = ranking[0]["score"]["priority_score"].as_f64().expect("score");
    let bottom = ranking[1]["score"]["priority_score"].as_f64().expect("score");
    assert!(top >= bottom);
    assert_eq!(ranking[0]["score"]["confidence"], 0.85);
}

#[tokio::test]
async fn anomaly_route_degrades_without_service() {
    let (router, service) = seeded_router();
    service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");

    let response = router
        .oneshot(post("/api/v1/grants/1/anomaly-check", json!({})))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn edit_route_conflicts_after_processing() {
    let (router, service) = seeded_router();
    let record = service
        .submit(&farmer("f-1", 5, MUNICIPALITY), submission(1, 5, MUNICIPALITY))
        .expect("submission accepted");
    service.mark_viewed(record.id, "admin-1").expect("view recorded");

    let uri = format!("/api/v1/applications/{}", record.id.0);
    let payload = json!({ "farmer_id": "f-1", "monthly_income_rs": 20000 });
    let response = router
        .oneshot(
            Request::put(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("serializes")))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
