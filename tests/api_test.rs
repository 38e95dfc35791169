use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use eventhub::api::build_router;
use eventhub::db::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_router(Arc::new(MemoryStore::new()))
}

fn event_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Two days of talks",
        "overview": "Everything about the web",
        "image": "/images/conf.png",
        "venue": "Expo Center",
        "location": "Porto",
        "date": "2025-11-20T09:00:00Z",
        "time": "9:00 am",
        "mode": "hybrid",
        "audience": "Web developers",
        "agenda": ["Keynote", "Workshops"],
        "organizer": "Web Porto",
        "tags": ["web", "javascript"]
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_fetch_event() {
    let app = app();

    let (status, body) = send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["slug"], "web-conf-2025");
    assert_eq!(body["event"]["date"], "2025-11-20");
    assert_eq!(body["event"]["time"], "09:00");

    let (status, body) = send(&app, "GET", "/events/web-conf-2025", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Web Conf 2025");

    let (status, body) = send(&app, "GET", "/events", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_event_returns_bad_request() {
    let app = app();
    let mut payload = event_payload("Bad Time");
    payload["time"] = json!("14:65");

    let (status, body) = send(&app, "POST", "/events", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Time out of range");
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let app = app();
    let (status, _) = send(&app, "GET", "/events/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_event_keeps_slug() {
    let app = app();
    send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/events/web-conf-2025",
        Some(json!({ "location": "Lisbon" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["slug"], "web-conf-2025");
    assert_eq!(body["event"]["location"], "Lisbon");
}

#[tokio::test]
async fn test_booking_flow() {
    let app = app();
    let (_, created) = send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;
    let event_id = created["event"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({ "eventId": event_id, "email": " Grace@Example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["email"], "grace@example.com");

    let (status, _) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({ "eventId": event_id, "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/events/web-conf-2025/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["bookings"][0]["eventId"], event_id.as_str());
}

#[tokio::test]
async fn test_booking_for_unknown_event() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({ "eventId": "65f1c2a4e4b0a1b2c3d4e5f6", "email": "grace@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Referenced event does not exist");
}

#[tokio::test]
async fn test_similar_events_route() {
    let app = app();
    send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;
    send(&app, "POST", "/events", Some(event_payload("JS Day"))).await;

    let (status, body) = send(&app, "GET", "/events/web-conf-2025/similar", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"][0]["slug"], "js-day");
}

#[tokio::test]
async fn test_patch_event_by_id() {
    let app = app();
    let (_, created) = send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;
    let event_id = created["event"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/events/id/{}", event_id),
        Some(json!({ "title": "Web Summit 2025", "time": "6:30 pm" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["id"], event_id.as_str());
    assert_eq!(body["event"]["slug"], "web-summit-2025");
    assert_eq!(body["event"]["time"], "18:30");
}

#[tokio::test]
async fn test_patch_event_by_id_rejects_bad_ids() {
    let app = app();

    let (status, body) = send(
        &app,
        "PATCH",
        "/events/id/not-an-id",
        Some(json!({ "location": "Lisbon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid event id");

    let (status, _) = send(
        &app,
        "PATCH",
        "/events/id/65f1c2a4e4b0a1b2c3d4e5f6",
        Some(json!({ "location": "Lisbon" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_booking() {
    let app = app();
    let (_, created) = send(&app, "POST", "/events", Some(event_payload("Web Conf 2025"))).await;
    let event_id = created["event"]["id"].as_str().unwrap().to_string();
    let (_, booked) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({ "eventId": event_id, "email": "grace@example.com" })),
    )
    .await;
    let booking_id = booked["booking"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/bookings/{}", booking_id),
        Some(json!({ "email": "  Grace.Hopper@Example.COM" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["id"], booking_id.as_str());
    assert_eq!(body["booking"]["email"], "grace.hopper@example.com");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/bookings/{}", booking_id),
        Some(json!({ "eventId": "65f1c2a4e4b0a1b2c3d4e5f6" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Referenced event does not exist");

    let (status, body) = send(
        &app,
        "PATCH",
        "/bookings/12345",
        Some(json!({ "email": "grace@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid booking id");
}
