//! End-to-end tests of the spectrometer routes over a simulated driver.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use spectrometer::{
    spectrometer_routes, DeviceRegistry, SimulatedDriver, SimulatedSpectrometer,
    SpectrometerApiState,
};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(ids: &[&str]) -> (Arc<SimulatedDriver>, Router) {
    let driver = Arc::new(SimulatedDriver::new(
        ids.iter().map(|id| SimulatedSpectrometer::named(*id)).collect(),
    ));
    let registry = Arc::new(DeviceRegistry::new(driver.clone()));
    let router = spectrometer_routes(Arc::new(SpectrometerApiState::new(registry)));
    (driver, router)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn put(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

#[tokio::test]
async fn lists_discovered_devices() {
    let (_, app) = app_with(&["SN12345"]);
    let (status, body) = get(&app, "/spectrometers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"device_ids": ["SN12345"]}));
}

#[tokio::test]
async fn lists_nothing_without_hardware() {
    let (_, app) = app_with(&[]);
    let (status, body) = get(&app, "/spectrometers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"device_ids": []}));

    let (status, _) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn config_write_then_spectrum_carries_version() {
    let (_, app) = app_with(&["SN12345"]);

    let (status, body) = put(
        &app,
        "/spectrometers/SN12345/config",
        r#"{"int_time": 50, "scans_to_avg": 1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"config_id": 1}));

    let (status, body) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config_id"], json!(1));
    assert_eq!(body["data"].as_array().unwrap().len(), 2048);
    assert!(body["timestamp"].as_i64().unwrap() > 1_600_000_000_000);

    let (_, config) = get(&app, "/spectrometers/SN12345/config").await;
    assert_eq!(config["int_time"], json!(50));
    assert_eq!(config["device_id"], json!("SN12345"));
}

#[tokio::test]
async fn fresh_device_reports_version_zero() {
    let (_, app) = app_with(&["SN12345"]);
    let (_, body) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(body["config_id"], json!(0));
}

#[tokio::test]
async fn malformed_body_is_rejected_without_bumping() {
    let (_, app) = app_with(&["SN12345"]);
    put(&app, "/spectrometers/SN12345/config", r#"{"int_time": 50}"#).await;

    for body in ["{not json", "[1, 2]", r#"{"int_time": "slow"}"#, r#"{"gain": 3}"#] {
        let (status, response) = put(&app, "/spectrometers/SN12345/config", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response, json!({"error": "json formatting"}));
    }

    let (_, body) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(body["config_id"], json!(1));
}

#[tokio::test]
async fn out_of_range_is_rejected_without_bumping() {
    let (_, app) = app_with(&["SN12345"]);

    let (status, body) = put(&app, "/spectrometers/SN12345/config", r#"{"int_time": -5}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "out of range: int_time must be between 3 and 65000, got -5"})
    );

    let (_, body) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(body["config_id"], json!(0));
}

#[tokio::test]
async fn unknown_device_wins_over_bad_body() {
    let (_, app) = app_with(&["SN12345"]);
    let (status, body) = put(&app, "/spectrometers/NOPE/config", "{not json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Device not found: NOPE"));

    let (status, _) = get(&app, "/spectrometers/NOPE/config").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_update_still_versions() {
    let (_, app) = app_with(&["SN12345"]);
    let (status, body) = put(&app, "/spectrometers/SN12345/config", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"config_id": 1}));
}

#[tokio::test]
async fn versions_increase_per_write() {
    let (_, app) = app_with(&["SN12345"]);
    for expected in 1..=3 {
        let (_, body) = put(
            &app,
            "/spectrometers/SN12345/config",
            &format!(r#"{{"int_time": {}}}"#, 10 * expected),
        )
        .await;
        assert_eq!(body, json!({"config_id": expected}));
    }
}

#[tokio::test]
async fn disconnected_device_is_a_server_error() {
    let (driver, app) = app_with(&["SN12345"]);
    get(&app, "/spectrometers").await;
    driver.device("SN12345").unwrap().disconnect();

    let (status, body) = get(&app, "/spectrometers/SN12345/spectrum").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Device disconnected: SN12345"));

    let (status, _) = put(&app, "/spectrometers/SN12345/config", r#"{"int_time": 50}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = get(&app, "/spectrometers").await;
    assert_eq!(body, json!({"device_ids": ["SN12345"]}));
}

#[tokio::test]
async fn enumeration_failure_is_retried_on_next_request() {
    let (driver, app) = app_with(&["SN12345"]);
    driver.fail_next_enumerations(1);

    let (status, _) = get(&app, "/spectrometers").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get(&app, "/spectrometers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"device_ids": ["SN12345"]}));
}

#[tokio::test]
async fn content_type_is_not_required() {
    let (_, app) = app_with(&["SN12345"]);
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/spectrometers/SN12345/config")
        .body(Body::from(r#"{"scans_to_avg": 4}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
