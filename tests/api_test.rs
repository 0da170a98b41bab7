use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use kisansetu_tracking::api::{self, AppState};
use kisansetu_tracking::lifecycle::{SystemConfig, TrackingSystem};
use kisansetu_tracking::model::{DeliveryId, DeliveryLocationUpdate, DeliveryStatus};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

fn app(system: &TrackingSystem) -> Router {
    api::router(AppState::new(system, 30.0))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, phone: &str, lat: f64, lng: f64) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/partners",
        Some(json!({
            "name": "Ravi",
            "phone": phone,
            "vehicle": "bike",
            "location": {"lat": lat, "lng": lng},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["partner"].clone()
}

#[tokio::test]
async fn assign_track_and_estimate() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);
    let partner = register(&app, "9800000001", 22.72, 75.86).await;
    assert_eq!(partner["id"], "partner_1");
    assert_eq!(partner["status"], "available");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({
            "orderId": "ORD-1",
            "partnerId": "partner_1",
            "destination": {"lat": 22.75, "lng": 75.90},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Delivery assigned successfully");
    assert_eq!(body["delivery"]["id"], "delivery_1");
    assert_eq!(body["delivery"]["status"], "Assigned");

    // A watcher on the room sees the PUT.
    let mut watcher = system.relay_client.join(DeliveryId(1)).await.unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/location/delivery_1",
        Some(json!({"location": "22.74,75.89"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["delivery"]["status"], "In Transit");

    let update = watcher.recv().await.unwrap();
    assert_eq!((update.lat, update.lng), (22.74, 75.89));
    assert_eq!(update.status, DeliveryStatus::InTransit);

    let (status, body) = call(&app, Method::GET, "/api/delivery/location/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"lat": 22.74, "lng": 75.89}));

    let (status, body) = call(&app, Method::GET, "/api/delivery/eta/delivery_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minutes"], 5);
    assert!(body["distanceKm"].as_f64().unwrap() < 2.0);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/status/delivery_1",
        Some(json!({"status": "Delivered"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivery"]["status"], "Delivered");
    assert_eq!(watcher.recv().await.unwrap().status, DeliveryStatus::Delivered);

    let (_, body) = call(&app, Method::GET, "/api/partners/partner_1", None).await;
    assert_eq!(body["partner"]["status"], "available");
    assert_eq!(body["partner"]["stats"]["successfulDeliveries"], 1);

    drop(app);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn errors_carry_status_and_body() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);

    let (status, body) = call(&app, Method::GET, "/api/delivery/location/delivery_9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Delivery not found");

    let (status, body) = call(&app, Method::GET, "/api/delivery/location/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({"orderId": "ORD-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "nobody to assign");

    register(&app, "9800000001", 22.72, 75.86).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/partners",
        Some(json!({
            "name": "Other",
            "phone": "9800000001",
            "vehicle": "van",
            "location": {"lat": 22.7, "lng": 75.8},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({"orderId": "ORD-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({"orderId": "ORD-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/location/delivery_2",
        Some(json!({"lat": 95.0, "lng": 75.86})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Latitude"));

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/delivery/status/delivery_2",
        Some(json!({"status": "Lost"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/api/delivery/eta/delivery_2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "no destination was given");
    assert_eq!(body["error"], "Destination not found");

    drop(app);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn partners_and_orders_are_listed() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);
    register(&app, "9800000001", 22.80, 75.95).await;
    register(&app, "9800000002", 22.72, 75.86).await;
    register(&app, "9800000003", 28.61, 77.20).await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/partners/available?lat=22.75&lng=75.90",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2, "Delhi is outside the service radius");
    assert_eq!(body["partners"][0]["id"], "partner_2");
    assert!(body["partners"][0]["distanceKm"].is_number());

    let (status, _) = call(&app, Method::GET, "/api/partners/available?lat=22.75", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/partners/partner_3/status",
        Some(json!({"status": "busy"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/partners/partner_3/status",
        Some(json!({"status": "offline"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["partner"]["status"], "offline");

    let (_, body) = call(&app, Method::GET, "/api/partners/available", None).await;
    assert_eq!(body["count"], 2);

    call(
        &app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({"orderId": "ORD-7", "partnerId": "partner_1"})),
    )
    .await;
    let (status, body) = call(&app, Method::GET, "/api/delivery/order/ORD-7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["deliveries"][0]["partnerId"], "partner_1");

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["relay"]["rooms"], 0);

    drop(app);
    system.shutdown().await.unwrap();
}

async fn assign_first(app: &Router) {
    register(app, "9800000001", 22.72, 75.86).await;
    let (status, body) = call(
        app,
        Method::POST,
        "/api/delivery/assign",
        Some(json!({
            "orderId": "ORD-1",
            "partnerId": "partner_1",
            "destination": {"lat": 22.75, "lng": 75.90},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn status_change_follows_a_live_socket_update() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);
    assign_first(&app).await;
    let mut watcher = system.relay_client.join(DeliveryId(1)).await.unwrap();

    // A rider's socket pushes a position the stored record never saw.
    system
        .relay_client
        .publish(DeliveryLocationUpdate {
            delivery_id: DeliveryId(1),
            lat: 22.9,
            lng: 75.95,
            status: DeliveryStatus::Assigned,
            timestamp: None,
        })
        .await
        .unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/status/delivery_1",
        Some(json!({"status": "In Transit"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let live = watcher.recv().await.unwrap();
    assert_eq!(live.lat, 22.9);
    let changed = timeout(Duration::from_secs(1), watcher.recv())
        .await
        .expect("status change was not relayed")
        .unwrap();
    assert_eq!(changed.status, DeliveryStatus::InTransit);
    assert_eq!((changed.lat, changed.lng), (22.72, 75.86));
    assert!(changed.timestamp >= live.timestamp);

    drop(app);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn future_timestamps_do_not_lock_out_later_reports() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);
    assign_first(&app).await;
    let mut watcher = system.relay_client.join(DeliveryId(1)).await.unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/location/delivery_1",
        Some(json!({"lat": 22.73, "lng": 75.87, "timestamp": "2099-01-01T00:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let stored = body["delivery"]["currentLocation"]["recordedAt"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!stored.starts_with("2099"), "stored {stored}");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/delivery/location/delivery_1",
        Some(json!({"location": "22.74,75.88"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["delivery"]["currentLocation"]["lat"], 22.74);

    assert_eq!(watcher.recv().await.unwrap().lat, 22.73);
    assert_eq!(watcher.recv().await.unwrap().lat, 22.74);

    drop(app);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn tracking_and_partner_performance() {
    let system = TrackingSystem::new(SystemConfig::default());
    let app = app(&system);
    assign_first(&app).await;

    let (status, body) = call(&app, Method::GET, "/api/delivery/tracking/delivery_1", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["deliveryStatus"], "Assigned");
    assert_eq!(body["currentLocation"]["lat"], 22.72);
    assert_eq!(body["destination"], json!({"lat": 22.75, "lng": 75.90}));
    assert_eq!(body["providerInfo"]["name"], "Ravi");
    assert_eq!(body["providerInfo"]["phone"], "9800000001");
    assert!(body["eta"]["minutes"].is_number());

    let (status, _) = call(&app, Method::GET, "/api/delivery/tracking/delivery_9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, Method::GET, "/api/partners/partner_1/performance", None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["performance"]["totalDelivered"], 0);
    assert_eq!(body["performance"]["activeDeliveries"], 1);
    assert_eq!(body["performance"]["successRate"], 0.0);

    for next in ["In Transit", "Delivered"] {
        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/delivery/status/delivery_1",
            Some(json!({"status": next})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, body) = call(&app, Method::GET, "/api/delivery/tracking/delivery_1", None).await;
    assert_eq!(body["deliveryStatus"], "Delivered");
    assert!(body["pickedUpAt"].is_string());
    assert!(body["deliveredAt"].is_string());
    assert!(body["eta"].is_null());

    let (status, body) = call(&app, Method::GET, "/api/partners/partner_1/performance", None).await;
    assert_eq!(status, StatusCode::OK);
    let performance = &body["performance"];
    assert_eq!(performance["totalDelivered"], 1);
    assert_eq!(performance["activeDeliveries"], 0);
    assert_eq!(performance["successRate"], 100.0);
    assert_eq!(performance["avgDeliveryTime"], 0, "delivered right after pickup");

    let (status, _) = call(&app, Method::GET, "/api/partners/partner_7/performance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    drop(app);
    system.shutdown().await.unwrap();
}
