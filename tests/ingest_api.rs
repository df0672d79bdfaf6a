//! Endpoint tests for the HTTP channel adapter and the read-side
//! projections, driven through the full router over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use coldwatch::models::{NewReading, Severity, Source, Threshold, Unit};
use coldwatch::pipeline::IngestionPipeline;
use coldwatch::routes::{self, AppState};
use coldwatch::store::MemStore;

// ---

fn test_app(store: &Arc<MemStore>) -> Router {
    // ---
    let pipeline = Arc::new(IngestionPipeline::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Duration::from_secs(5),
    ));
    routes::router(AppState {
        pipeline,
        readings: store.clone(),
        alerts: store.clone(),
        units: store.clone(),
    })
}

fn freezer_store() -> Arc<MemStore> {
    // ---
    let store = Arc::new(MemStore::new());
    store.add_threshold(Threshold {
        unit_id: 3,
        temp_min: -25.0,
        temp_max: -15.0,
        humidity_min: 30.0,
        humidity_max: 60.0,
        active: true,
    });
    store
}

async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    // ---
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    // ---
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    // ---
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---

#[tokio::test]
async fn log_reading_rejects_missing_fields() {
    // ---
    let store = freezer_store();
    let response = post_json(
        test_app(&store),
        "/api/readings/log",
        json!({ "unit_id": 3, "temperature": -20.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Missing required fields: unit_id, temperature, humidity"
    );
    // A client error has no side effects.
    assert!(store.readings().is_empty());
}

#[tokio::test]
async fn zero_is_a_valid_value() {
    // ---
    let store = freezer_store();
    let response = post_json(
        test_app(&store),
        "/api/readings/log",
        json!({ "unit_id": 3, "temperature": 0, "humidity": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.readings().len(), 1);
    assert_eq!(store.readings()[0].temperature, 0.0);
}

#[tokio::test]
async fn violating_submission_logs_reading_and_alert() {
    // ---
    let store = freezer_store();
    let response = post_json(
        test_app(&store),
        "/api/readings/log",
        json!({
            "unit_id": 3,
            "temperature": -10.0,
            "humidity": 45.0,
            "timestamp": "2024-01-01T00:00:00Z",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["unit_id"], 3);
    assert_eq!(body["data"]["temperature"], -10.0);

    let readings = store.readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].source, Source::Http);

    let alerts = store.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(
        alerts[0].message,
        "Temperature -10°C is out of safe range (-25°C to -15°C)"
    );
    assert_eq!(
        alerts[0].ts,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert!(!alerts[0].resolved);
}

#[tokio::test]
async fn storage_failure_returns_500_with_details() {
    // ---
    let store = freezer_store();
    store.fail_readings(true);

    let response = post_json(
        test_app(&store),
        "/api/readings/log",
        json!({ "unit_id": 3, "temperature": -20.0, "humidity": 45.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Database error");
    assert!(body["details"].is_string());
    assert!(store.alerts().is_empty());
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    // ---
    let store = freezer_store();
    let response = get(test_app(&store), "/api/readings/log").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---

#[tokio::test]
async fn latest_returns_one_reading_per_unit() {
    // ---
    let store = Arc::new(MemStore::new());
    let app = test_app(&store);

    for (unit_id, temperature, hour) in [(1, -20.0, 0), (1, -19.0, 1), (2, 4.0, 0)] {
        post_json(
            app.clone(),
            "/api/readings/log",
            json!({
                "unit_id": unit_id,
                "temperature": temperature,
                "humidity": 45.0,
                "timestamp": Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            }),
        )
        .await;
    }

    let response = get(app, "/api/readings/latest").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["unit_id"], 1);
    assert_eq!(rows[0]["temperature"], -19.0);
    assert_eq!(rows[1]["unit_id"], 2);
}

#[tokio::test]
async fn history_requires_unit_id() {
    // ---
    let store = Arc::new(MemStore::new());
    let response = get(test_app(&store), "/api/readings/history").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing unit_id");
}

#[tokio::test]
async fn history_returns_trailing_window_ascending() {
    // ---
    let store = Arc::new(MemStore::new());
    let app = test_app(&store);

    let now = Utc::now();
    for hours_ago in [48, 3, 1] {
        post_json(
            app.clone(),
            "/api/readings/log",
            json!({
                "unit_id": 5,
                "temperature": -20.0,
                "humidity": 45.0,
                "timestamp": now - chrono::Duration::hours(hours_ago),
            }),
        )
        .await;
    }

    let response = get(app, "/api/readings/history?unit_id=5&hours=24").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    // The 48h-old reading falls outside the window; order is ts ascending.
    assert_eq!(rows.len(), 2);
    let first: chrono::DateTime<Utc> = serde_json::from_value(rows[0]["ts"].clone()).unwrap();
    let second: chrono::DateTime<Utc> = serde_json::from_value(rows[1]["ts"].clone()).unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn read_endpoints_fail_soft_when_store_is_down() {
    // ---
    let store = freezer_store();

    // Seed one alert, then break both stores.
    let pipeline = IngestionPipeline::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Duration::from_secs(5),
    );
    pipeline
        .ingest(NewReading {
            unit_id: 3,
            ts: Utc::now(),
            temperature: -10.0,
            humidity: 45.0,
            source: Source::Http,
        })
        .await
        .unwrap();
    store.fail_readings(true);
    store.fail_alerts(true);

    let app = test_app(&store);
    for uri in ["/api/alerts", "/api/readings/latest"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri} must fail soft");
        let body = body_json(response).await;
        assert_eq!(body, json!([]), "{uri} must return an empty collection");
    }
}

#[tokio::test]
async fn recent_alerts_are_newest_first() {
    // ---
    let store = freezer_store();
    let app = test_app(&store);

    for hour in [0, 2, 1] {
        post_json(
            app.clone(),
            "/api/readings/log",
            json!({
                "unit_id": 3,
                "temperature": -10.0,
                "humidity": 45.0,
                "timestamp": Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            }),
        )
        .await;
    }

    let response = get(app, "/api/alerts").await;
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["ts"], "2024-01-01T02:00:00Z");
    assert_eq!(rows[2]["ts"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn storage_units_lists_the_catalog() {
    // ---
    let store = Arc::new(MemStore::new());
    store.add_unit(Unit {
        unit_id: 1,
        name: "Freezer A".to_string(),
        product_type: "frozen goods".to_string(),
        location: "warehouse 1".to_string(),
    });

    let response = get(test_app(&store), "/api/storage-units").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["name"], "Freezer A");
    assert_eq!(body[0]["unit_id"], 1);
}
